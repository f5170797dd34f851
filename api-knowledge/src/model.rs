//! Knowledge-base data model, persisted as `knowledge_base.json`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods that are extracted from the specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Parses a path-item key (`get`, `POST`, ...). Non-operation keys such as
    /// `parameters` or `summary` yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business category assigned to an endpoint by the tag/path rules in
/// [`crate::extract::categorize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowCategory {
    AuthenticationSetup,
    UserManagement,
    TemplateManagement,
    ContactManagement,
    ContractParties,
    FileManagement,
    ContractPublishing,
    ContractManagement,
    IntegrationAutomation,
    #[default]
    General,
}

impl WorkflowCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationSetup => "authentication_setup",
            Self::UserManagement => "user_management",
            Self::TemplateManagement => "template_management",
            Self::ContactManagement => "contact_management",
            Self::ContractParties => "contract_parties",
            Self::FileManagement => "file_management",
            Self::ContractPublishing => "contract_publishing",
            Self::ContractManagement => "contract_management",
            Self::IntegrationAutomation => "integration_automation",
            Self::General => "general",
        }
    }
}

/// One operation parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    /// `path`, `query`, `header` or `cookie`.
    #[serde(rename = "in", default)]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object")]
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Raw media-type mapping (`application/json` → schema, ...).
    #[serde(default = "empty_object")]
    pub content: Value,
}

/// Metadata for one HTTP operation, keyed `"METHOD path"` in [`KnowledgeBase::endpoints`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "operationId", default)]
    pub operation_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    /// Status code → raw response object.
    #[serde(default)]
    pub responses: BTreeMap<String, Value>,
    #[serde(default)]
    pub workflow_category: WorkflowCategory,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

impl EndpointRecord {
    /// Map key for this record.
    pub fn key(&self) -> String {
        endpoint_key(self.method, &self.path)
    }
}

/// Builds the `"METHOD path"` key.
pub fn endpoint_key(method: HttpMethod, path: &str) -> String {
    format!("{method} {path}")
}

/// Hand-authored ordered sequence of endpoint calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub description: String,
    /// Human-readable steps, one per call.
    pub steps: Vec<String>,
    pub endpoints_sequence: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseMetadata {
    pub created_at: DateTime<Utc>,
    pub api_version: String,
    pub title: String,
}

/// One snapshot of the flattened API description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub metadata: KnowledgeBaseMetadata,
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointRecord>,
    #[serde(default)]
    pub workflows: BTreeMap<String, Workflow>,
    /// `components.schemas` of the source document, untouched.
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
}

impl KnowledgeBase {
    /// `true` when this snapshot is the built-in minimal fallback.
    pub fn is_fallback(&self) -> bool {
        self.metadata.api_version == crate::workflows::FALLBACK_API_VERSION
    }
}

/// Short description of a knowledge-base snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KnowledgeSummary {
    pub endpoint_count: usize,
    pub workflow_count: usize,
    pub schema_count: usize,
    pub api_version: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub fallback: bool,
}

/// One hit from [`crate::ApiKnowledge::search_endpoints`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EndpointMatch {
    pub endpoint: String,
    pub info: EndpointRecord,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parsing_ignores_non_operation_keys() {
        assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("parameters"), None);
        assert_eq!(HttpMethod::parse("options"), None);
    }

    #[test]
    fn sparse_endpoint_json_gets_defaults() {
        let rec: EndpointRecord = serde_json::from_value(serde_json::json!({
            "path": "/accounts/me",
            "method": "GET",
            "summary": "Get account information",
            "workflow_category": "authentication_setup"
        }))
        .unwrap();
        assert_eq!(rec.key(), "GET /accounts/me");
        assert!(rec.parameters.is_empty());
        assert!(rec.request_body.is_none());
        assert_eq!(rec.workflow_category, WorkflowCategory::AuthenticationSetup);
    }

    #[test]
    fn parameter_location_serializes_as_in() {
        let p = Parameter {
            name: "id".into(),
            location: "path".into(),
            required: true,
            description: String::new(),
            schema: empty_object(),
            example: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["in"], "path");
        assert!(v.get("example").is_none());
    }
}
