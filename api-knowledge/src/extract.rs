//! Flattening of an OpenAPI document into [`KnowledgeBase`] records.
//!
//! Categories and prerequisite/follow-up lists come from fixed tag and path
//! substring rules. They approximate call ordering and are not derived from
//! schema references.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::KnowledgeResult;
use crate::model::{
    EndpointRecord, HttpMethod, KnowledgeBase, KnowledgeBaseMetadata, Parameter, RequestBody,
    WorkflowCategory, endpoint_key,
};
use crate::workflows::define_workflows;

/// Parses YAML text into a JSON value.
pub fn parse_spec(text: &str) -> KnowledgeResult<Value> {
    let yaml: serde_yml::Value = serde_yml::from_str(text)?;
    Ok(yaml_to_json(yaml))
}

/// Converts a YAML tree to JSON. Non-string mapping keys (status codes are
/// often plain integers) are rendered as strings; tags are dropped.
pub fn yaml_to_json(v: serde_yml::Value) -> Value {
    use serde_yml::Value as Y;
    match v {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Y::Mapping(m) => {
            let mut out = Map::with_capacity(m.len());
            for (k, v) in m {
                out.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(out)
        }
        Y::Tagged(t) => yaml_to_json(t.value),
    }
}

fn yaml_key(k: serde_yml::Value) -> String {
    match yaml_to_json(k) {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Builds a full snapshot from a parsed specification document.
pub fn build_knowledge_base(spec: &Value, created_at: DateTime<Utc>) -> KnowledgeBase {
    let info = spec.get("info");
    let api_version = info
        .and_then(|i| i.get("version"))
        .map(scalar_to_string)
        .unwrap_or_else(|| "unknown".to_string());
    let title = info
        .and_then(|i| i.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("OneFlow API")
        .to_string();

    let endpoints = extract_endpoints(spec);
    debug!(endpoints = endpoints.len(), %api_version, "specification flattened");

    KnowledgeBase {
        metadata: KnowledgeBaseMetadata {
            created_at,
            api_version,
            title,
        },
        endpoints,
        workflows: define_workflows(),
        schemas: extract_schemas(spec),
    }
}

/// One record per `GET/POST/PUT/DELETE/PATCH` operation, keyed `"METHOD path"`.
pub fn extract_endpoints(spec: &Value) -> BTreeMap<String, EndpointRecord> {
    let mut out = BTreeMap::new();
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return out;
    };

    for (path, path_item) in paths {
        let Some(ops) = path_item.as_object() else {
            continue;
        };
        for (method_key, op) in ops {
            let Some(method) = HttpMethod::parse(method_key) else {
                continue;
            };
            let tags = string_list(op.get("tags"));
            let record = EndpointRecord {
                path: path.clone(),
                method,
                summary: str_field(op, "summary"),
                description: str_field(op, "description"),
                operation_id: str_field(op, "operationId"),
                workflow_category: categorize(path, &tags),
                tags,
                parameters: extract_parameters(op),
                request_body: extract_request_body(op),
                responses: op
                    .get("responses")
                    .and_then(Value::as_object)
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default(),
                prerequisites: prerequisites(path, method),
                follow_ups: follow_ups(path, method),
            };
            out.insert(endpoint_key(method, path), record);
        }
    }
    out
}

fn extract_parameters(op: &Value) -> Vec<Parameter> {
    let Some(params) = op.get("parameters").and_then(Value::as_array) else {
        return Vec::new();
    };
    params
        .iter()
        .map(|p| Parameter {
            name: str_field(p, "name"),
            location: str_field(p, "in"),
            required: p.get("required").and_then(Value::as_bool).unwrap_or(false),
            description: str_field(p, "description"),
            schema: p
                .get("schema")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            example: p.get("example").filter(|v| !v.is_null()).cloned(),
        })
        .collect()
}

fn extract_request_body(op: &Value) -> Option<RequestBody> {
    let body = op.get("requestBody").filter(|b| !b.is_null())?;
    Some(RequestBody {
        description: str_field(body, "description"),
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        content: body
            .get("content")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    })
}

/// `components.schemas`, verbatim.
pub fn extract_schemas(spec: &Value) -> BTreeMap<String, Value> {
    spec.pointer("/components/schemas")
        .and_then(Value::as_object)
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// Assigns a business category. Tags are checked in a fixed order; for
/// contract-tagged operations the path decides the sub-category.
pub fn categorize(path: &str, tags: &[String]) -> WorkflowCategory {
    let has_tag = |needle: &str| tags.iter().any(|t| t.to_lowercase().contains(needle));

    if has_tag("account") {
        WorkflowCategory::AuthenticationSetup
    } else if has_tag("user") {
        WorkflowCategory::UserManagement
    } else if has_tag("template") {
        WorkflowCategory::TemplateManagement
    } else if has_tag("contact") {
        WorkflowCategory::ContactManagement
    } else if has_tag("contract") {
        if path.contains("parties") || path.contains("participants") {
            WorkflowCategory::ContractParties
        } else if path.contains("files") {
            WorkflowCategory::FileManagement
        } else if path.contains("publish") {
            WorkflowCategory::ContractPublishing
        } else {
            WorkflowCategory::ContractManagement
        }
    } else if has_tag("webhook") {
        WorkflowCategory::IntegrationAutomation
    } else {
        WorkflowCategory::General
    }
}

/// Endpoint keys that usually have to be called before this one.
pub fn prerequisites(path: &str, method: HttpMethod) -> Vec<String> {
    let mut out = Vec::new();
    if path.contains("/contracts/create") {
        push_unique(&mut out, &["GET /templates", "GET /accounts/me"]);
    }
    if method == HttpMethod::Post && path.contains("/parties") {
        push_unique(&mut out, &["POST /contracts/create"]);
    }
    if method == HttpMethod::Post && path.contains("/participants") {
        push_unique(
            &mut out,
            &["POST /contracts/create", "POST /contracts/{id}/parties"],
        );
    }
    out
}

/// Endpoint keys that usually follow this one.
pub fn follow_ups(path: &str, method: HttpMethod) -> Vec<String> {
    let mut out = Vec::new();
    if path.contains("/contracts/create") {
        push_unique(
            &mut out,
            &[
                "POST /contracts/{id}/parties",
                "POST /contracts/{id}/files",
                "POST /contracts/{id}/publish",
            ],
        );
    }
    if method == HttpMethod::Post && path.contains("/parties") {
        push_unique(
            &mut out,
            &[
                "POST /contracts/{id}/parties/{party_id}/participants",
                "POST /contracts/{id}/publish",
            ],
        );
    }
    out
}

fn push_unique(out: &mut Vec<String>, keys: &[&str]) {
    for k in keys {
        if !out.iter().any(|e| e == k) {
            out.push((*k).to_string());
        }
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
openapi: 3.0.0
info:
  title: OneFlow Public API
  version: 1.4.0
paths:
  /contracts/create:
    post:
      summary: Create a contract
      operationId: createContract
      tags: [Contracts]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Contract'
      responses:
        200:
          description: OK
  /contracts/{id}/parties/{party_id}/participants:
    parameters:
      - name: id
        in: path
    post:
      summary: Add participant
      tags: [Contracts]
      parameters:
        - name: id
          in: path
          required: true
          schema: {type: integer}
          example: 42
      responses:
        '201':
          description: Created
  /templates:
    get:
      summary: List templates
      tags: [Templates]
components:
  schemas:
    Contract:
      type: object
"#;

    fn kb() -> KnowledgeBase {
        build_knowledge_base(&parse_spec(SPEC).unwrap(), Utc::now())
    }

    #[test]
    fn flattens_operations_and_skips_path_level_keys() {
        let kb = kb();
        let keys: Vec<_> = kb.endpoints.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "GET /templates",
                "POST /contracts/create",
                "POST /contracts/{id}/parties/{party_id}/participants",
            ]
        );
        assert_eq!(kb.metadata.api_version, "1.4.0");
        assert_eq!(kb.metadata.title, "OneFlow Public API");
        assert!(kb.schemas.contains_key("Contract"));
        assert_eq!(kb.workflows.len(), 3);
    }

    #[test]
    fn integer_response_codes_become_string_keys() {
        let kb = kb();
        let create = &kb.endpoints["POST /contracts/create"];
        assert!(create.responses.contains_key("200"));
        assert_eq!(create.operation_id, "createContract");
        let body = create.request_body.as_ref().unwrap();
        assert!(body.required);
        assert!(body.content.get("application/json").is_some());
    }

    #[test]
    fn parameters_keep_schema_and_example() {
        let kb = kb();
        let p = &kb.endpoints["POST /contracts/{id}/parties/{party_id}/participants"].parameters[0];
        assert_eq!(p.location, "path");
        assert!(p.required);
        assert_eq!(p.example, Some(Value::from(42)));
        assert_eq!(p.schema["type"], "integer");
    }

    #[test]
    fn categorize_follows_tag_order_then_path() {
        let t = |s: &str| vec![s.to_string()];
        assert_eq!(categorize("/accounts/me", &t("Accounts")), WorkflowCategory::AuthenticationSetup);
        assert_eq!(categorize("/users", &t("Users")), WorkflowCategory::UserManagement);
        assert_eq!(
            categorize("/contracts/{id}/parties", &t("Contracts")),
            WorkflowCategory::ContractParties
        );
        assert_eq!(
            categorize("/contracts/{id}/files", &t("Contracts")),
            WorkflowCategory::FileManagement
        );
        assert_eq!(
            categorize("/contracts/{id}/publish", &t("Contracts")),
            WorkflowCategory::ContractPublishing
        );
        assert_eq!(categorize("/contracts", &t("Contracts")), WorkflowCategory::ContractManagement);
        assert_eq!(categorize("/webhooks", &t("Webhooks")), WorkflowCategory::IntegrationAutomation);
        assert_eq!(categorize("/ping", &[]), WorkflowCategory::General);
        // "Contract templates" matches the template rule before the contract one.
        assert_eq!(
            categorize("/contracts/files", &t("Contract templates")),
            WorkflowCategory::TemplateManagement
        );
    }

    #[test]
    fn prerequisite_rules_are_deduplicated() {
        let pre = prerequisites(
            "/contracts/{id}/parties/{party_id}/participants",
            HttpMethod::Post,
        );
        assert_eq!(pre, vec!["POST /contracts/create", "POST /contracts/{id}/parties"]);

        assert_eq!(
            prerequisites("/contracts/create", HttpMethod::Post),
            vec!["GET /templates", "GET /accounts/me"]
        );
        assert!(prerequisites("/contracts/{id}/parties", HttpMethod::Get).is_empty());
    }

    #[test]
    fn follow_up_rules() {
        assert_eq!(follow_ups("/contracts/create", HttpMethod::Post).len(), 3);
        assert_eq!(
            follow_ups("/contracts/{id}/parties", HttpMethod::Post),
            vec![
                "POST /contracts/{id}/parties/{party_id}/participants",
                "POST /contracts/{id}/publish",
            ]
        );
        assert!(follow_ups("/contracts/{id}/parties", HttpMethod::Delete).is_empty());
    }

    #[test]
    fn missing_info_uses_defaults() {
        let kb = build_knowledge_base(&serde_json::json!({}), Utc::now());
        assert_eq!(kb.metadata.api_version, "unknown");
        assert_eq!(kb.metadata.title, "OneFlow API");
        assert!(kb.endpoints.is_empty());
    }
}
