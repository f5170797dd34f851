//! Static workflow templates and the minimal fallback knowledge base.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::model::{
    EndpointRecord, HttpMethod, KnowledgeBase, KnowledgeBaseMetadata, Workflow, WorkflowCategory,
};

pub const FALLBACK_API_VERSION: &str = "fallback";
pub const FALLBACK_TITLE: &str = "OneFlow API (Fallback)";

fn workflow(name: &str, description: &str, steps: &[&str], sequence: &[&str]) -> Workflow {
    Workflow {
        name: name.to_string(),
        description: description.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        endpoints_sequence: sequence.iter().map(|s| s.to_string()).collect(),
    }
}

/// The three hand-authored call sequences.
pub fn define_workflows() -> BTreeMap<String, Workflow> {
    let mut m = BTreeMap::new();
    m.insert(
        "basic_contract_creation".to_string(),
        workflow(
            "Basic Contract Creation",
            "Create a simple contract from template",
            &[
                "GET /accounts/me - Verify account access",
                "GET /templates - Find available templates",
                "POST /contracts/create - Create contract from template",
                "POST /contracts/{id}/parties - Add contract parties",
                "POST /contracts/{id}/publish - Publish for signing",
            ],
            &[
                "GET /accounts/me",
                "GET /templates",
                "POST /contracts/create",
                "POST /contracts/{id}/parties",
                "POST /contracts/{id}/publish",
            ],
        ),
    );
    m.insert(
        "contact_management".to_string(),
        workflow(
            "Contact Management",
            "Manage contacts for contract parties",
            &[
                "GET /contacts - List existing contacts",
                "POST /contacts - Create new contact",
                "GET /contacts/{id} - Retrieve contact details",
            ],
            &["GET /contacts", "POST /contacts"],
        ),
    );
    m.insert(
        "webhook_integration".to_string(),
        workflow(
            "Webhook Integration",
            "Setup real-time notifications",
            &[
                "POST /webhooks - Create webhook endpoint",
                "GET /webhooks - List configured webhooks",
                "GET /contracts/{id}/events - Monitor contract events",
            ],
            &["POST /webhooks", "GET /webhooks"],
        ),
    );
    m
}

/// Single-endpoint snapshot used when neither the network nor a cached
/// specification is available. Never written to disk.
pub fn fallback_knowledge_base() -> KnowledgeBase {
    let account = EndpointRecord {
        path: "/accounts/me".to_string(),
        method: HttpMethod::Get,
        summary: "Get account information".to_string(),
        description: String::new(),
        operation_id: String::new(),
        tags: Vec::new(),
        parameters: Vec::new(),
        request_body: None,
        responses: BTreeMap::new(),
        workflow_category: WorkflowCategory::AuthenticationSetup,
        prerequisites: Vec::new(),
        follow_ups: Vec::new(),
    };

    let mut endpoints = BTreeMap::new();
    endpoints.insert(account.key(), account);

    KnowledgeBase {
        metadata: KnowledgeBaseMetadata {
            created_at: Utc::now(),
            api_version: FALLBACK_API_VERSION.to_string(),
            title: FALLBACK_TITLE.to_string(),
        },
        endpoints,
        workflows: define_workflows(),
        schemas: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_sequences_reference_endpoint_keys() {
        let wf = define_workflows();
        assert_eq!(
            wf.keys().collect::<Vec<_>>(),
            vec!["basic_contract_creation", "contact_management", "webhook_integration"]
        );
        for w in wf.values() {
            assert!(!w.steps.is_empty());
            for key in &w.endpoints_sequence {
                let method = key.split(' ').next().unwrap_or_default();
                assert!(HttpMethod::parse(method).is_some(), "{key}");
            }
        }
    }

    #[test]
    fn fallback_has_single_account_endpoint() {
        let kb = fallback_knowledge_base();
        assert!(kb.is_fallback());
        assert_eq!(kb.endpoints.len(), 1);
        let rec = &kb.endpoints["GET /accounts/me"];
        assert_eq!(rec.workflow_category, WorkflowCategory::AuthenticationSetup);
        assert!(kb.schemas.is_empty());
    }
}
