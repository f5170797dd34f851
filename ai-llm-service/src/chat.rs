//! Object-safe chat seam used by the assessment engines.
//!
//! Engines depend on [`ChatCompletion`] rather than on a concrete client so a
//! profile from [`LlmServiceProfiles`] and an in-process double are
//! interchangeable.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    error_handler::AiLlmError,
    service_profiles::{LlmRole, LlmServiceProfiles},
};

/// Boxed future returned by [`ChatCompletion::complete`].
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Single-turn chat completion: optional system message plus a user prompt.
pub trait ChatCompletion: Send + Sync {
    fn complete<'a>(&'a self, system: Option<&'a str>, prompt: &'a str) -> ChatFuture<'a>;

    /// Model identifier, for logs and status output.
    fn model_name(&self) -> &str;
}

/// [`ChatCompletion`] bound to one role of a shared [`LlmServiceProfiles`].
#[derive(Clone)]
pub struct ProfileChat {
    svc: Arc<LlmServiceProfiles>,
    role: LlmRole,
}

impl ProfileChat {
    pub fn new(svc: Arc<LlmServiceProfiles>, role: LlmRole) -> Self {
        Self { svc, role }
    }
}

impl ChatCompletion for ProfileChat {
    fn complete<'a>(&'a self, system: Option<&'a str>, prompt: &'a str) -> ChatFuture<'a> {
        Box::pin(async move { self.svc.generate(self.role, prompt, system).await })
    }

    fn model_name(&self) -> &str {
        &self.svc.profile(self.role).model
    }
}
