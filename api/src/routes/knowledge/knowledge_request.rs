use serde::Deserialize;

/// Query string of `GET /knowledge/endpoints`.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointQuery {
    /// Case-insensitive substring; empty matches every endpoint.
    #[serde(default)]
    pub query: String,
}
