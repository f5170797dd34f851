/// Provider (backend) used for language-model inference.
///
/// Only the OpenAI REST API is wired today; new backends extend this enum
/// and get their own service under `services/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI chat/completions and embeddings API.
    OpenAI,
}
