//! Starter corpus for empty collections.

use api_knowledge::{EndpointRecord, KnowledgeBase};
use rag_store::{Collection, RagDocument, SourceType};
use serde_json::Value;

/// Seed documents for `collection`. API documents are derived from `kb`.
pub fn seed_documents(collection: Collection, kb: &KnowledgeBase) -> Vec<RagDocument> {
    match collection {
        Collection::ApiSpecifications => api_documents(kb),
        Collection::IntegrationGuides => integration_guides(),
        Collection::TutorialsExamples => tutorials(),
        Collection::GlossaryConcepts => glossary(),
        Collection::UseCasesPatterns => use_cases(),
    }
}

/// One document per endpoint, or two generic ones when the knowledge base has none.
pub fn api_documents(kb: &KnowledgeBase) -> Vec<RagDocument> {
    if kb.endpoints.is_empty() {
        return fallback_api_documents();
    }
    kb.endpoints
        .values()
        .map(|e| {
            RagDocument::new(endpoint_content(e))
                .with("source_type", SourceType::ApiSpec.as_str())
                .with("endpoint", e.path.clone())
                .with("method", e.method.as_str())
                .with("operation_id", e.operation_id.clone())
                .with("summary", e.summary.clone())
                .with("complexity", endpoint_complexity(e))
        })
        .collect()
}

fn or_placeholder<'a>(s: &'a str, placeholder: &'a str) -> &'a str {
    if s.trim().is_empty() { placeholder } else { s }
}

pub fn endpoint_content(e: &EndpointRecord) -> String {
    let mut lines = vec![
        format!("API Endpoint: {} {}", e.method, e.path),
        format!("Summary: {}", or_placeholder(&e.summary, "No summary available")),
        format!(
            "Description: {}",
            or_placeholder(&e.description, "No description available")
        ),
    ];

    if !e.parameters.is_empty() {
        lines.push("Parameters:".into());
        for p in &e.parameters {
            let mut line = format!(
                "- {} ({}): {}",
                or_placeholder(&p.name, "unknown"),
                or_placeholder(&p.location, "unknown"),
                or_placeholder(&p.description, "No description")
            );
            if p.required {
                line.push_str(" [Required]");
            }
            lines.push(line);
        }
    }

    if !e.responses.is_empty() {
        lines.push("Responses:".into());
        for (code, resp) in &e.responses {
            let desc = resp
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("No description");
            lines.push(format!("- {code}: {desc}"));
        }
    }

    lines.join("\n")
}

/// `min(params, 5) + required params + 2 for a body`: up to 3 low, up to 7 medium.
pub fn endpoint_complexity(e: &EndpointRecord) -> &'static str {
    let required = e.parameters.iter().filter(|p| p.required).count();
    let body = if e.request_body.is_some() { 2 } else { 0 };
    match e.parameters.len().min(5) + required + body {
        0..=3 => "low",
        4..=7 => "medium",
        _ => "high",
    }
}

fn fallback_api_documents() -> Vec<RagDocument> {
    [
        (
            "POST /contracts",
            "Create a new contract",
            "Create a new contract endpoint allows you to programmatically create contracts. \
             Requires template ID, participant data, and contract details. Returns contract ID for further operations.",
        ),
        (
            "GET /contracts/{id}",
            "Get contract by ID",
            "Retrieve contract details by ID. Returns contract status, participants, and metadata. \
             Used for checking contract state and progress.",
        ),
    ]
    .into_iter()
    .map(|(endpoint, summary, body)| {
        RagDocument::new(format!("{endpoint}\n{summary}\n\n{body}"))
            .with("source_type", SourceType::ApiSpec.as_str())
            .with("endpoint", endpoint)
            .with("complexity", "medium")
    })
    .collect()
}

pub fn integration_guides() -> Vec<RagDocument> {
    [
        (
            "Standard Integration Overview",
            "Standard integrations are account-specific integrations that solve specific use cases. \
             Most data is hardcoded or automatically fetched. Examples include webform contract creation \
             and signup process integration.",
            "standard",
            "low",
        ),
        (
            "Application Integration Patterns",
            "Application integrations connect OneFlow with external systems like CRM or ATS. \
             Data is dynamically collected via UI. Examples include Salesforce and HubSpot integrations.",
            "application",
            "medium",
        ),
        (
            "Partner Integration Framework",
            "Partner integrations are generic integrations allowing any account to connect \
             with external systems. They rely entirely on dynamic data from systems or users.",
            "partner",
            "high",
        ),
    ]
    .into_iter()
    .map(|(title, body, level, complexity)| {
        RagDocument::new(format!("{title}\n\n{body}"))
            .with("source_type", SourceType::IntegrationGuide.as_str())
            .with("integration_level", level)
            .with("complexity", complexity)
            .with("title", title)
    })
    .collect()
}

pub fn tutorials() -> Vec<RagDocument> {
    let title = "Web Form Integration Tutorial";
    let body = "Step-by-step guide for creating contracts via web forms:\n\
                1. Create web form with contract fields\n\
                2. Use contract create endpoint\n\
                3. Publish contract to participants\n\
                4. Handle user authentication for signing";
    vec![
        RagDocument::new(format!("{title}\n\n{body}"))
            .with("source_type", SourceType::Tutorial.as_str())
            .with("complexity", "medium")
            .with("use_case", "web_forms")
            .with("title", title),
    ]
}

pub fn glossary() -> Vec<RagDocument> {
    [
        (
            "Contract",
            "A digital agreement created in OneFlow with participants, terms, and signature requirements.",
        ),
        (
            "Participant",
            "A real person in a contract who represents a party. Participants marked as signatories must sign the contract.",
        ),
        (
            "Party",
            "A legal entity in a contract (company or individual). All parties are represented by participants.",
        ),
        (
            "Template",
            "A predefined contract structure that can be used to create contracts with consistent formatting and fields.",
        ),
        (
            "Workspace",
            "A logical separation within an account for organizing contracts, templates, and users with specific permissions.",
        ),
    ]
    .into_iter()
    .map(|(term, definition)| {
        RagDocument::new(format!("Term: {term}\nDefinition: {definition}"))
            .with("source_type", SourceType::Glossary.as_str())
            .with("term", term.to_lowercase())
            .with("complexity", "low")
    })
    .collect()
}

pub fn use_cases() -> Vec<RagDocument> {
    [
        (
            "CRM Integration Pattern",
            "Common pattern for CRM integration:\n\
             - Sync contact data from CRM to OneFlow\n\
             - Create contracts based on CRM opportunities\n\
             - Update contract status back to CRM\n\
             - Handle multi-party contracts with CRM data",
            "Streamlined sales process",
            "medium",
        ),
        (
            "E-commerce Checkout Integration",
            "Pattern for e-commerce contract creation:\n\
             - Customer completes purchase\n\
             - System generates contract from order data\n\
             - Automatic contract delivery via email\n\
             - Integration with payment processing",
            "Automated contract fulfillment",
            "low",
        ),
    ]
    .into_iter()
    .map(|(title, body, value, complexity)| {
        RagDocument::new(format!("{title}\n\n{body}\n\nBusiness Value: {value}"))
            .with("source_type", SourceType::UseCase.as_str())
            .with("complexity", complexity)
            .with("business_value", value)
            .with("title", title)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_knowledge::workflows::fallback_knowledge_base;

    fn record(json: serde_json::Value) -> EndpointRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn corpus_sizes() {
        let kb = fallback_knowledge_base();
        assert_eq!(integration_guides().len(), 3);
        assert_eq!(tutorials().len(), 1);
        assert_eq!(glossary().len(), 5);
        assert_eq!(use_cases().len(), 2);
        assert_eq!(seed_documents(Collection::ApiSpecifications, &kb).len(), kb.endpoints.len());
    }

    #[test]
    fn every_seed_document_is_tagged_with_its_collection_type() {
        let kb = fallback_knowledge_base();
        for c in Collection::ALL {
            for d in seed_documents(c, &kb) {
                assert_eq!(d.source_type(), Some(c.source_type()), "{c}");
            }
        }
    }

    #[test]
    fn empty_knowledge_base_uses_generic_api_docs() {
        let mut kb = fallback_knowledge_base();
        kb.endpoints.clear();
        let docs = api_documents(&kb);
        assert_eq!(docs.len(), 2);
        assert!(docs[0].content.starts_with("POST /contracts\nCreate a new contract"));
    }

    #[test]
    fn endpoint_document_layout() {
        let e = record(serde_json::json!({
            "path": "/contracts/{id}/parties",
            "method": "POST",
            "summary": "Add party",
            "parameters": [
                { "name": "id", "in": "path", "required": true, "description": "Contract id" },
                { "name": "x-oneflow-user-email", "in": "header" }
            ],
            "request_body": { "description": "Party", "required": true, "content": {} },
            "responses": { "200": { "description": "OK" }, "404": {} }
        }));
        assert_eq!(
            endpoint_content(&e),
            "API Endpoint: POST /contracts/{id}/parties\n\
             Summary: Add party\n\
             Description: No description available\n\
             Parameters:\n\
             - id (path): Contract id [Required]\n\
             - x-oneflow-user-email (header): No description\n\
             Responses:\n\
             - 200: OK\n\
             - 404: No description"
        );
        // 2 params + 1 required + 2 for the body
        assert_eq!(endpoint_complexity(&e), "medium");
    }

    #[test]
    fn complexity_bands() {
        let bare = record(serde_json::json!({ "path": "/ping", "method": "GET" }));
        assert_eq!(endpoint_complexity(&bare), "low");

        let params: Vec<_> = (0..6)
            .map(|i| serde_json::json!({ "name": format!("p{i}"), "in": "query", "required": true }))
            .collect();
        let heavy = record(serde_json::json!({ "path": "/x", "method": "GET", "parameters": params }));
        // min(6, 5) + 6
        assert_eq!(endpoint_complexity(&heavy), "high");
    }
}
