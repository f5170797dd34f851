//! The five topical collections and the source-type tags stored with documents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content-type tag carried in every document's `source_type` metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    ApiSpec,
    IntegrationGuide,
    Tutorial,
    Glossary,
    UseCase,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        SourceType::ApiSpec,
        SourceType::IntegrationGuide,
        SourceType::Tutorial,
        SourceType::Glossary,
        SourceType::UseCase,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiSpec => "api_spec",
            Self::IntegrationGuide => "integration_guide",
            Self::Tutorial => "tutorial",
            Self::Glossary => "glossary",
            Self::UseCase => "use_case",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical collection. Physical names may carry a prefix, see
/// [`crate::RagConfig::collection_name`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    ApiSpecifications,
    IntegrationGuides,
    TutorialsExamples,
    GlossaryConcepts,
    UseCasesPatterns,
}

impl Collection {
    /// Declaration order; also the order of cross-collection search.
    pub const ALL: [Collection; 5] = [
        Collection::ApiSpecifications,
        Collection::IntegrationGuides,
        Collection::TutorialsExamples,
        Collection::GlossaryConcepts,
        Collection::UseCasesPatterns,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ApiSpecifications => "api_specifications",
            Self::IntegrationGuides => "integration_guides",
            Self::TutorialsExamples => "tutorials_examples",
            Self::GlossaryConcepts => "glossary_concepts",
            Self::UseCasesPatterns => "use_cases_patterns",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == s)
    }

    /// Tag of documents seeded into this collection.
    pub fn source_type(self) -> SourceType {
        match self {
            Self::ApiSpecifications => SourceType::ApiSpec,
            Self::IntegrationGuides => SourceType::IntegrationGuide,
            Self::TutorialsExamples => SourceType::Tutorial,
            Self::GlossaryConcepts => SourceType::Glossary,
            Self::UseCasesPatterns => SourceType::UseCase,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ApiSpecifications => "API endpoints, parameters, responses",
            Self::IntegrationGuides => "Integration patterns and workflows",
            Self::TutorialsExamples => "Step-by-step guides and examples",
            Self::GlossaryConcepts => "Terminology and concept definitions",
            Self::UseCasesPatterns => "Business scenarios and patterns",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for c in Collection::ALL {
            assert_eq!(Collection::parse(c.name()), Some(c));
        }
        for t in SourceType::ALL {
            assert_eq!(SourceType::parse(t.as_str()), Some(t));
        }
        assert_eq!(SourceType::parse("API_SPEC"), None);
    }

    #[test]
    fn each_collection_has_distinct_source_type() {
        let mut tags: Vec<_> = Collection::ALL.iter().map(|c| c.source_type()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 5);
    }
}
