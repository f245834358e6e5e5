//! Integration tests for `SqliteStore` against an in-memory database.

use weft_core::{
  ontology::{Ontology, PredicateDef},
  store::{ConfigStore, EndpointConfig},
};

use crate::{Error, SqliteStore, store::DEFAULT_PREVIEW_ROWS};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn custom_ontology(id: &str) -> Ontology {
  let mut ontology = Ontology::example();
  ontology.id = id.to_string();
  ontology.name = format!("Custom {id}");
  ontology
}

// ─── Ontologies ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn builtins_are_always_listed() {
  let s = store().await;
  let all = s.list_ontologies().await.unwrap();
  let ids: Vec<&str> = all.iter().map(|o| o.id.as_str()).collect();
  assert_eq!(&ids[..2], &["example", "blank"]);
}

#[tokio::test]
async fn save_and_get_custom_ontology() {
  let s = store().await;
  s.save_ontology(custom_ontology("films")).await.unwrap();

  let fetched = s.get_ontology("films").await.unwrap().unwrap();
  assert_eq!(fetched.name, "Custom films");

  let all = s.list_ontologies().await.unwrap();
  assert!(all.iter().any(|o| o.id == "films"));
}

#[tokio::test]
async fn save_replaces_existing_version() {
  let s = store().await;
  s.save_ontology(custom_ontology("films")).await.unwrap();

  let mut updated = custom_ontology("films");
  updated.predicates.push(PredicateDef {
    name: "director".into(),
    uri:  "schema:director".into(),
  });
  s.save_ontology(updated).await.unwrap();

  let fetched = s.get_ontology("films").await.unwrap().unwrap();
  assert!(fetched.predicates.iter().any(|p| p.name == "director"));
  let films: Vec<_> = s
    .list_ontologies()
    .await
    .unwrap()
    .into_iter()
    .filter(|o| o.id == "films")
    .collect();
  assert_eq!(films.len(), 1);
}

#[tokio::test]
async fn reserved_ids_cannot_be_overwritten() {
  let s = store().await;
  for id in ["example", "blank"] {
    let r = s.save_ontology(custom_ontology(id)).await;
    assert!(matches!(
      r,
      Err(Error::Core(weft_core::Error::ReservedOntologyId(_)))
    ));
    let r = s.delete_ontology(id).await;
    assert!(r.is_err());
  }
  // The built-ins are untouched.
  let example = s.get_ontology("example").await.unwrap().unwrap();
  assert_eq!(example, Ontology::example());
}

#[tokio::test]
async fn invalid_ontology_is_rejected_before_any_write() {
  let s = store().await;
  let mut bad = custom_ontology("bad");
  bad.base = String::new();
  assert!(s.save_ontology(bad).await.is_err());
  assert!(s.get_ontology("bad").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_custom_ontology_and_selection() {
  let s = store().await;
  s.save_ontology(custom_ontology("films")).await.unwrap();
  s.set_selected_ontology("films").await.unwrap();

  s.delete_ontology("films").await.unwrap();
  assert!(s.get_ontology("films").await.unwrap().is_none());
  assert_eq!(s.selected_ontology().await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_ontology_row_is_reset_with_defaults_intact() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO ontologies (id, body, updated_at)
         VALUES ('broken', '{not json', '2024-01-01T00:00:00Z')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  // Reads treat the corrupt row as absent and remove it.
  assert!(s.get_ontology("broken").await.unwrap().is_none());
  let all = s.list_ontologies().await.unwrap();
  assert_eq!(all.len(), 2); // just the built-ins

  let remaining: i64 = s
    .conn
    .call(|conn| {
      let n =
        conn.query_row("SELECT COUNT(*) FROM ontologies", [], |r| r.get(0))?;
      Ok(n)
    })
    .await
    .unwrap();
  assert_eq!(remaining, 0);
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn selection_round_trip() {
  let s = store().await;
  assert_eq!(s.selected_ontology().await.unwrap(), None);

  s.set_selected_ontology("example").await.unwrap();
  assert_eq!(
    s.selected_ontology().await.unwrap().as_deref(),
    Some("example")
  );
}

#[tokio::test]
async fn selecting_unknown_ontology_fails_and_keeps_previous() {
  let s = store().await;
  s.set_selected_ontology("example").await.unwrap();

  let r = s.set_selected_ontology("missing").await;
  assert!(matches!(
    r,
    Err(Error::Core(weft_core::Error::OntologyNotFound(_)))
  ));
  assert_eq!(
    s.selected_ontology().await.unwrap().as_deref(),
    Some("example")
  );
}

#[tokio::test]
async fn failed_save_leaves_selection_unchanged() {
  // A malformed custom ontology submitted while another is selected: the
  // save aborts, the selection stays.
  let s = store().await;
  s.set_selected_ontology("example").await.unwrap();

  let mut bad = custom_ontology("new");
  bad.name = String::new();
  assert!(s.save_ontology(bad).await.is_err());
  assert_eq!(
    s.selected_ontology().await.unwrap().as_deref(),
    Some("example")
  );
}

// ─── Endpoint ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn endpoint_defaults_until_saved() {
  let s = store().await;
  assert_eq!(s.load_endpoint().await.unwrap(), EndpointConfig::default());
}

#[tokio::test]
async fn endpoint_round_trip() {
  let s = store().await;
  let config = EndpointConfig {
    url:         "https://sparql.example/update".to_string(),
    method:      "PUT".to_string(),
    headers:     r#"{"Authorization": "Bearer abc"}"#.to_string(),
    named_graph: "http://example.org/graphs/main".to_string(),
  };
  s.save_endpoint(&config).await.unwrap();
  assert_eq!(s.load_endpoint().await.unwrap(), config);
}

#[tokio::test]
async fn endpoint_with_invalid_headers_is_rejected() {
  let s = store().await;
  let config = EndpointConfig {
    headers: "not json".to_string(),
    ..EndpointConfig::default()
  };
  assert!(s.save_endpoint(&config).await.is_err());
  // Stored value untouched.
  assert_eq!(s.load_endpoint().await.unwrap(), EndpointConfig::default());
}

#[tokio::test]
async fn corrupt_endpoint_setting_resets_to_default() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO settings (key, value) VALUES ('endpoint', '{oops')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();
  assert_eq!(s.load_endpoint().await.unwrap(), EndpointConfig::default());
}

// ─── Preferences ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn preview_rows_default_and_round_trip() {
  let s = store().await;
  assert_eq!(s.preview_rows().await.unwrap(), DEFAULT_PREVIEW_ROWS);

  s.set_preview_rows(25).await.unwrap();
  assert_eq!(s.preview_rows().await.unwrap(), 25);
}
