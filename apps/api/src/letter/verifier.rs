//! Fact Verifier: asks the model which sentences of the draft are not backed
//! by the facts. Advisory only: the draft is never rewritten here.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::letter::drafter::DraftLetter;
use crate::letter::facts::{parse_bullets, ExtractedFacts};
use crate::letter::prompts::{render_prompt, VERIFY_PROMPT_TEMPLATE, VERIFY_SYSTEM};
use crate::llm_client::{require_text, CompletionClient, CompletionRequest};

const CLEAN_MARKER: &str = "CLEAN";

/// Unbulleted answers that mean nothing was flagged.
const NO_ISSUE_PHRASES: &[&str] = &[
    "no unsupported",
    "nothing unsupported",
    "no issues",
    "are supported",
    "is supported",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "flagged_lines", rename_all = "snake_case")]
pub enum VerificationStatus {
    Clean,
    FlaggedLines(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(flatten)]
    pub status: VerificationStatus,
}

impl VerificationResult {
    pub fn is_clean(&self) -> bool {
        self.status == VerificationStatus::Clean
    }

    pub fn flagged_lines(&self) -> &[String] {
        match &self.status {
            VerificationStatus::Clean => &[],
            VerificationStatus::FlaggedLines(lines) => lines,
        }
    }
}

pub async fn verify_letter(
    llm: &dyn CompletionClient,
    draft: &DraftLetter,
    facts: &ExtractedFacts,
) -> Result<VerificationResult, AppError> {
    let facts_block = facts.facts_block();
    let prompt = render_prompt(
        VERIFY_PROMPT_TEMPLATE,
        &[("facts_block", &facts_block), ("letter", &draft.body_text)],
    );
    let response = llm
        .complete(&CompletionRequest::new(VERIFY_SYSTEM, prompt))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::VerificationFailed(e.to_string()))?;

    let result = parse_verification(&response).ok_or_else(|| {
        AppError::VerificationFailed(format!(
            "unrecognised verifier answer: {}",
            response.lines().next().unwrap_or_default()
        ))
    })?;
    info!(
        "Verification: {} sentence(s) flagged",
        result.flagged_lines().len()
    );
    Ok(result)
}

/// Reads the verifier's answer.
///
/// Bulleted sentences are flagged, whatever else the answer says. Without
/// bullets, a `CLEAN` line or a known no-issue phrasing means clean. Any
/// other prose is not interpreted and yields `None`.
pub fn parse_verification(response: &str) -> Option<VerificationResult> {
    let flagged = parse_bullets(response);
    if !flagged.is_empty() {
        return Some(VerificationResult {
            status: VerificationStatus::FlaggedLines(flagged),
        });
    }

    let lines: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() || lines.iter().any(|l| is_clean_marker(l) || is_no_issue(l)) {
        return Some(VerificationResult {
            status: VerificationStatus::Clean,
        });
    }
    None
}

fn is_clean_marker(line: &str) -> bool {
    line.trim_end_matches(|c: char| c.is_ascii_punctuation())
        .eq_ignore_ascii_case(CLEAN_MARKER)
}

fn is_no_issue(line: &str) -> bool {
    let line = line.to_lowercase();
    let negated = line.contains("not ") || line.contains("n't");
    !negated && NO_ISSUE_PHRASES.iter().any(|phrase| line.contains(phrase))
}
