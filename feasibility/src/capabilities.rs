//! Hand-curated catalog of OneFlow business capabilities.
//!
//! Endpoint lists are advisory text; they are not checked against the
//! knowledge base and may name paths the current specification lacks.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub name: &'static str,
    pub description: &'static str,
    pub supported: bool,
    pub caveats: &'static [&'static str],
    pub endpoints: &'static [&'static str],
}

pub const CAPABILITIES: &[Capability] = &[
    Capability {
        name: "contract_creation",
        description: "Create contracts from templates or scratch",
        supported: true,
        caveats: &["Requires valid template", "Template must be active"],
        endpoints: &["/templates", "/contracts/create"],
    },
    Capability {
        name: "file_management",
        description: "Upload and manage files/documents",
        supported: true,
        caveats: &[
            "Template must allow file attachments",
            "Size limits apply",
            "Separate API call after contract creation",
        ],
        endpoints: &["/contracts/{id}/files"],
    },
    Capability {
        name: "multi_party_contracts",
        description: "Contracts with multiple parties and signers",
        supported: true,
        caveats: &["Each party needs valid email", "Signing order configurable"],
        endpoints: &["/contracts/{id}/parties", "/contracts/{id}/participants"],
    },
    Capability {
        name: "template_management",
        description: "Create and manage contract templates",
        supported: true,
        caveats: &[
            "Template creation may require admin rights",
            "Template changes affect existing contracts",
        ],
        endpoints: &["/templates", "/template_types"],
    },
    Capability {
        name: "webhook_integration",
        description: "Real-time notifications and integrations",
        supported: true,
        caveats: &["Requires accessible webhook endpoint", "Event types are predefined"],
        endpoints: &["/webhooks"],
    },
    Capability {
        name: "contact_management",
        description: "Manage contacts and party information",
        supported: true,
        caveats: &[
            "Contact validation depends on data quality",
            "Duplicate detection is basic",
        ],
        endpoints: &["/contacts"],
    },
    Capability {
        name: "contract_publishing",
        description: "Publish contracts for signing",
        supported: true,
        caveats: &["All required fields must be completed", "Cannot unpublish once sent"],
        endpoints: &["/contracts/{id}/publish"],
    },
    Capability {
        name: "data_extraction",
        description: "Extract data from signed contracts",
        supported: true,
        caveats: &[
            "Depends on template data field configuration",
            "Custom fields need setup",
        ],
        endpoints: &["/contracts/{id}/data_fields"],
    },
];

pub fn get_capability_info(name: &str) -> Option<&'static Capability> {
    CAPABILITIES.iter().find(|c| c.name == name)
}

/// Capability names in catalog order.
pub fn list_capabilities() -> Vec<&'static str> {
    CAPABILITIES.iter().map(|c| c.name).collect()
}

/// One `- name: description (Caveats: a, b)` line per capability.
pub fn catalog_prompt_lines() -> String {
    CAPABILITIES
        .iter()
        .map(|c| {
            format!(
                "- {}: {} (Caveats: {})",
                c.name,
                c.description,
                c.caveats.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
