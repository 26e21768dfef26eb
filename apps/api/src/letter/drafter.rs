//! Letter Drafter: one completion call that writes the letter.
//!
//! Grounding here is a prompt-level contract only: the prompt forbids
//! fabrication, and the advisory verifier and grounding check run afterwards.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::letter::facts::ExtractedFacts;
use crate::letter::job_summary::JobSummary;
use crate::letter::prompts::{render_prompt, DRAFT_PROMPT_TEMPLATE, DRAFT_SYSTEM};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{require_text, CompletionClient, CompletionRequest};

/// Slight variation in wording; facts are pinned by the prompt.
const DRAFT_TEMPERATURE: f32 = 0.2;

/// Shown to the model when no example letter was supplied.
const NO_EXAMPLE: &str = "[none]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLetter {
    pub body_text: String,
}

/// Drafts the letter from facts, job summary and the example letter's text.
pub async fn draft_letter(
    llm: &dyn CompletionClient,
    facts: &ExtractedFacts,
    summary: &JobSummary,
    example_text: Option<&str>,
) -> Result<DraftLetter, AppError> {
    let prompt = build_draft_prompt(facts, summary, example_text);
    let body_text = llm
        .complete(&CompletionRequest::new(DRAFT_SYSTEM, prompt).with_temperature(DRAFT_TEMPERATURE))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::DraftingFailed(e.to_string()))?;

    info!(
        "Drafted letter: {} words",
        body_text.split_whitespace().count()
    );
    Ok(DraftLetter { body_text })
}

pub fn build_draft_prompt(
    facts: &ExtractedFacts,
    summary: &JobSummary,
    example_text: Option<&str>,
) -> String {
    let example_text = example_text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_EXAMPLE);

    let summary_block = summary.prompt_block();
    let facts_block = facts.facts_block();
    render_prompt(
        DRAFT_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("plain_text_instruction", PLAIN_TEXT_INSTRUCTION),
            ("summary_block", &summary_block),
            ("facts_block", &facts_block),
            ("example_text", example_text),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::stub::ScriptedCompletion;

    fn acme_facts() -> ExtractedFacts {
        ExtractedFacts {
            bullet_facts: vec!["Software Engineer at Acme, 2019–2022".to_string()],
            recent_stations: vec!["2019–2022 | Software Engineer | Acme".to_string()],
        }
    }

    fn management_summary() -> JobSummary {
        JobSummary {
            company: "Beta Inc.".to_string(),
            role: "Engineering Manager".to_string(),
            requirements: vec!["5 years management experience".to_string()],
            contact_person: Some("Dana Rivera".to_string()),
        }
    }

    #[test]
    fn test_prompt_forbids_fabrication_and_labels_sections() {
        let prompt = build_draft_prompt(&acme_facts(), &management_summary(), Some("Dear Sir, ..."));

        assert!(prompt.contains("Do NOT fabricate experience"));
        assert!(prompt.contains("omit it entirely rather than fabricate"));
        assert!(prompt.contains("style reference only — do not copy content"));
        assert!(prompt.contains("the only facts you may state about the candidate"));
        assert!(prompt.contains("requirements to address, only where supported by facts"));
        assert!(prompt.contains("- 5 years management experience"));
        assert!(prompt.contains("Contact person: Dana Rivera"));
        assert!(prompt.contains("Dear Sir, ..."));
    }

    #[test]
    fn test_prompt_contains_facts_exactly() {
        let facts = acme_facts();
        let prompt = build_draft_prompt(&facts, &management_summary(), None);
        assert!(prompt.contains(&facts.facts_block()));
        assert!(prompt.contains(NO_EXAMPLE));
    }

    #[test]
    fn test_example_placeholders_are_not_expanded() {
        let prompt = build_draft_prompt(&acme_facts(), &management_summary(), Some("{facts_block}"));
        assert_eq!(prompt.matches("- Software Engineer at Acme").count(), 1);
    }

    #[test]
    fn test_placeholders_in_facts_and_summary_stay_literal() {
        let facts = ExtractedFacts {
            bullet_facts: vec!["Template var {example_text} in CV".to_string()],
            recent_stations: vec![],
        };
        let mut summary = management_summary();
        summary.requirements = vec!["Knows {facts_block} syntax".to_string()];

        let prompt = build_draft_prompt(&facts, &summary, Some("I led 40 engineers at Globex."));

        assert!(prompt.contains("- Template var {example_text} in CV"));
        assert!(prompt.contains("- Knows {facts_block} syntax"));
        assert_eq!(prompt.matches("Globex").count(), 1);
        assert_eq!(prompt.matches("Template var").count(), 1);
    }

    #[tokio::test]
    async fn test_draft_letter_passes_facts_unmodified() {
        let llm = ScriptedCompletion::new().reply(DRAFT_SYSTEM, "Dear Dana Rivera,\n\nI worked at Acme.");
        let facts = acme_facts();
        let before = facts.clone();

        let draft = draft_letter(&llm, &facts, &management_summary(), None)
            .await
            .unwrap();

        assert_eq!(draft.body_text, "Dear Dana Rivera,\n\nI worked at Acme.");
        assert_eq!(facts, before);
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].temperature - DRAFT_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_draft_is_drafting_failure() {
        let llm = ScriptedCompletion::new().reply(DRAFT_SYSTEM, "\n\n");
        let err = draft_letter(&llm, &acme_facts(), &management_summary(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DraftingFailed(_)));
    }
}
