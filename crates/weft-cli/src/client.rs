//! HTTP client for submitting generated RDF to a SPARQL endpoint.
//!
//! The endpoint receives a JSON envelope — `{format, graph?, ontology?,
//! triples}` — using the method and extra headers from the stored
//! [`EndpointConfig`]. Non-2xx responses surface the response body verbatim;
//! there is no retry and no partial-success handling.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use weft_core::{Ontology, store::EndpointConfig};
use weft_rdf::RdfFormat;

pub struct SparqlClient {
  http:   reqwest::Client,
  config: EndpointConfig,
}

/// Build the submission envelope. `graph` is omitted when empty, matching
/// endpoints that treat an absent key as the default graph.
fn envelope(
  format: RdfFormat,
  named_graph: &str,
  ontology: &Ontology,
  serialized: &str,
) -> Value {
  let mut body = serde_json::Map::new();
  body.insert("format".to_string(), json!(format.tag()));
  if !named_graph.is_empty() {
    body.insert("graph".to_string(), json!(named_graph));
  }
  body.insert(
    "ontology".to_string(),
    json!({ "prefixes": ontology.prefixes, "base": ontology.base }),
  );
  body.insert("triples".to_string(), json!(serialized));
  Value::Object(body)
}

impl SparqlClient {
  pub fn new(config: EndpointConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .build()
      .context("building HTTP client")?;
    Ok(Self { http, config })
  }

  /// POST (or whatever method is configured) the serialized document.
  /// Returns the endpoint's response body on success.
  pub async fn submit(
    &self,
    format: RdfFormat,
    ontology: &Ontology,
    serialized: &str,
  ) -> Result<String> {
    if self.config.url.is_empty() {
      bail!("SPARQL endpoint URL is not configured");
    }
    let method = reqwest::Method::from_bytes(self.config.method.as_bytes())
      .with_context(|| format!("invalid HTTP method {:?}", self.config.method))?;
    let headers = self
      .config
      .parsed_headers()
      .context("parsing endpoint headers")?;

    let payload =
      envelope(format, &self.config.named_graph, ontology, serialized);
    let mut request =
      self.http.request(method, &self.config.url).json(&payload);
    for (name, value) in headers {
      request = request.header(name, value);
    }

    let response = request
      .send()
      .await
      .with_context(|| format!("sending RDF to {}", self.config.url))?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
      bail!("endpoint returned {status}: {body}");
    }
    Ok(body)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
