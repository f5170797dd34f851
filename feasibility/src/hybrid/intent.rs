//! Bag-of-words routing of a question to collections.

use rag_store::Collection;

/// Keyword lists per collection. Order breaks score ties.
const INTENT_RULES: &[(Collection, &[&str])] = &[
    (
        Collection::ApiSpecifications,
        &["endpoint", "api", "parameter", "response", "request", "method", "post", "get"],
    ),
    (
        Collection::IntegrationGuides,
        &["integrate", "integration", "connect", "sync", "crm", "system", "workflow"],
    ),
    (
        Collection::TutorialsExamples,
        &["how to", "tutorial", "example", "step", "guide", "implement"],
    ),
    (
        Collection::UseCasesPatterns,
        &["business", "scenario", "pattern", "value", "benefit", "process"],
    ),
    (
        Collection::GlossaryConcepts,
        &["what is", "define", "meaning", "term", "concept"],
    ),
];

/// Keyword hits per collection, in rule order.
pub fn analyze_intent(question: &str) -> Vec<(Collection, usize)> {
    let q = question.to_lowercase();
    INTENT_RULES
        .iter()
        .map(|(c, kws)| (*c, kws.iter().filter(|k| q.contains(*k)).count()))
        .collect()
}

/// Up to `n` best-scoring collections, skipping zero scores.
pub fn top_collections(scores: &[(Collection, usize)], n: usize) -> Vec<Collection> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .filter(|(_, s)| *s > 0)
        .map(|(c, _)| c)
        .collect()
}
