//! Reviser: strict-editor rewrite of a letter against its facts.
//!
//! Only runs when the user asks for it; the generation pipeline never
//! re-drafts on its own.

use tracing::info;

use crate::errors::AppError;
use crate::letter::drafter::DraftLetter;
use crate::letter::facts::ExtractedFacts;
use crate::letter::prompts::{render_prompt, REVISE_PROMPT_TEMPLATE, REVISE_SYSTEM};
use crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION;
use crate::llm_client::{require_text, CompletionClient, CompletionRequest};

pub async fn revise_letter(
    llm: &dyn CompletionClient,
    letter: &DraftLetter,
    facts: &ExtractedFacts,
) -> Result<DraftLetter, AppError> {
    if facts.bullet_facts.is_empty() {
        return Err(AppError::Validation(
            "At least one fact is required to revise a letter.".to_string(),
        ));
    }

    let facts_block = facts.facts_block();
    let prompt = render_prompt(
        REVISE_PROMPT_TEMPLATE,
        &[
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("facts_block", &facts_block),
            ("letter", &letter.body_text),
        ],
    );
    let body_text = llm
        .complete(&CompletionRequest::new(REVISE_SYSTEM, prompt))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::RevisionFailed(e.to_string()))?;

    info!(
        "Revised letter: {} -> {} words",
        letter.body_text.split_whitespace().count(),
        body_text.split_whitespace().count()
    );
    Ok(DraftLetter { body_text })
}
