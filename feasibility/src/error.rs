use ai_llm_service::AiLlmError;
use api_knowledge::KnowledgeError;
use doc_loader::LoaderError;
use rag_store::RagError;
use thiserror::Error;

pub type FeasibilityResult<T> = Result<T, FeasibilityError>;

#[derive(Debug, Error)]
pub enum FeasibilityError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Rag(#[from] RagError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Model reply without a usable JSON object.
    #[error("could not parse model reply: {0}")]
    Parse(String),

    #[error("no search results for question")]
    NoResults,

    #[error("hybrid engine is not available")]
    HybridUnavailable,
}
