// Letter pipeline: fact extraction, job summary, drafting, verification.
// All LLM calls go through llm_client::CompletionClient; no direct vendor calls here.

pub mod drafter;
pub mod facts;
pub mod grounding;
pub mod handlers;
pub mod job_summary;
pub mod pipeline;
pub mod prompts;
pub mod reviser;
pub mod session;
pub mod verifier;
