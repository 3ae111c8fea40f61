//! Chat-completion adapter for the counsellor chatbot and the expert
//! evaluation, with deterministic fallback text when the endpoint fails.

pub mod advisor;
pub mod client;
pub mod fallback;
pub mod prompts;
pub mod router;
pub mod types;

#[cfg(test)]
mod tests;

pub use advisor::AiAdvisor;
pub use client::{ChatCompletion, CompletionError, HttpCompletionClient};
pub use router::{ai_router, ChatRequest};
pub use types::{
    AiInputError, AiReply, ChatMessage, ChatRole, CompletionRequest, DifferenceLevel,
    ExpertEvaluationInput, StudentContext,
};
