use std::future::Future;
use std::pin::Pin;

use crate::assessment::{Assessment, EngineKind};
use crate::hybrid::HybridEngine;
use crate::simple_engine::SimpleEngine;

pub type AssessFuture<'a> = Pin<Box<dyn Future<Output = Assessment> + Send + 'a>>;

/// Common face of both engines. `assess` is infallible; each engine degrades
/// to its own fallback result instead.
pub trait AssessmentEngine: Send + Sync {
    fn assess<'a>(&'a self, question: &'a str) -> AssessFuture<'a>;

    fn kind(&self) -> EngineKind;
}

impl AssessmentEngine for SimpleEngine {
    fn assess<'a>(&'a self, question: &'a str) -> AssessFuture<'a> {
        Box::pin(async move { SimpleEngine::assess(self, question).await.into() })
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Simple
    }
}

impl AssessmentEngine for HybridEngine {
    fn assess<'a>(&'a self, question: &'a str) -> AssessFuture<'a> {
        Box::pin(async move { HybridEngine::assess(self, question).await.into() })
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Hybrid
    }
}
