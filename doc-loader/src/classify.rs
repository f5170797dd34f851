//! Keyword heuristics for document type, complexity and integration level.

use serde::{Deserialize, Serialize};

/// Inferred document type; decides the target collection at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Api,
    Tutorial,
    Glossary,
    UseCase,
    Integration,
}

impl DocType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Tutorial => "tutorial",
            Self::Glossary => "glossary",
            Self::UseCase => "use_case",
            Self::Integration => "integration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationLevel {
    Standard,
    Application,
    Partner,
}

impl IntegrationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Application => "application",
            Self::Partner => "partner",
        }
    }
}

const FILENAME_RULES: &[(DocType, &[&str])] = &[
    (DocType::Api, &["api", "endpoint", "reference"]),
    (DocType::Tutorial, &["tutorial", "guide", "howto", "step"]),
    (DocType::Glossary, &["glossary", "definition", "terms"]),
    (DocType::UseCase, &["usecase", "use_case", "scenario", "example"]),
];

const CONTENT_RULES: &[(DocType, &[&str])] = &[
    (DocType::Api, &["endpoint", "api call", "http", "rest"]),
    (DocType::Tutorial, &["step 1", "first step", "tutorial", "how to"]),
    (DocType::Glossary, &["definition:", "means:", "refers to"]),
    (DocType::UseCase, &["use case", "scenario", "example"]),
];

const TECHNICAL_KEYWORDS: &[&str] = &["api", "endpoint", "json", "webhook", "authentication", "oauth"];

fn first_match(haystack: &str, rules: &[(DocType, &[&str])]) -> Option<DocType> {
    rules
        .iter()
        .find(|(_, kws)| kws.iter().any(|k| haystack.contains(k)))
        .map(|(t, _)| *t)
}

/// Filename keywords first, then content keywords; `Integration` otherwise.
pub fn doc_type(filename: &str, content: &str) -> DocType {
    first_match(&filename.to_lowercase(), FILENAME_RULES)
        .or_else(|| first_match(&content.to_lowercase(), CONTENT_RULES))
        .unwrap_or(DocType::Integration)
}

/// Length bands (<800 low, <3000 medium) raised by technical vocabulary:
/// five or more technical keywords force `High`, two or more lift `Low` to `Medium`.
pub fn complexity(content: &str) -> Complexity {
    let len = content.chars().count();
    let base = if len < 800 {
        Complexity::Low
    } else if len < 3000 {
        Complexity::Medium
    } else {
        Complexity::High
    };

    let lower = content.to_lowercase();
    let technical = TECHNICAL_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    if technical >= 5 {
        Complexity::High
    } else if technical >= 2 && base == Complexity::Low {
        Complexity::Medium
    } else {
        base
    }
}

pub fn integration_level(content: &str) -> IntegrationLevel {
    let lower = content.to_lowercase();
    if ["partner", "marketplace", "generic"].iter().any(|k| lower.contains(k)) {
        IntegrationLevel::Partner
    } else if ["application", "crm", "system integration"]
        .iter()
        .any(|k| lower.contains(k))
    {
        IntegrationLevel::Application
    } else {
        IntegrationLevel::Standard
    }
}

/// File stem with `_`/`-` as spaces, each word capitalised.
pub fn title_from_stem(stem: &str) -> String {
    let spaced = stem.replace(['_', '-'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
