//! Letter pipeline: orchestrates one run from loaded documents to checked letter.
//!
//! Flow: extract_facts → summarize_job → draft_letter → verify_letter →
//!       ungrounded_terms → return outcome.
//!
//! Steps run strictly in sequence and nothing is retried. Extraction,
//! summary and drafting failures end the run; a verification failure is
//! downgraded to a warning and the draft is still returned.

use serde::Serialize;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::documents::SourceDocument;
use crate::errors::AppError;
use crate::letter::drafter::{draft_letter, DraftLetter};
use crate::letter::facts::{extract_facts, ExtractedFacts};
use crate::letter::grounding::ungrounded_terms;
use crate::letter::job_summary::{summarize_job, JobSummary};
use crate::letter::verifier::{verify_letter, VerificationResult};
use crate::llm_client::CompletionClient;

/// The three loaded inputs of one run.
#[derive(Debug, Clone)]
pub struct LetterInputs {
    pub cv: SourceDocument,
    pub job_description: SourceDocument,
    pub example_letter: Option<SourceDocument>,
}

/// Everything a run produces, intermediate artifacts included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterOutcome {
    pub facts: ExtractedFacts,
    pub job_summary: JobSummary,
    pub draft: DraftLetter,
    /// `None` when the verifier could not run; see `warnings`.
    pub verification: Option<VerificationResult>,
    pub ungrounded_terms: Vec<String>,
    pub warnings: Vec<String>,
}

/// Runs the full pipeline for one set of inputs.
pub async fn generate_letter(
    llm: &dyn CompletionClient,
    inputs: &LetterInputs,
    run_id: Uuid,
) -> Result<LetterOutcome, AppError> {
    let span = tracing::info_span!("letter_run", %run_id);
    run(llm, inputs).instrument(span).await
}

async fn run(llm: &dyn CompletionClient, inputs: &LetterInputs) -> Result<LetterOutcome, AppError> {
    // Step 1: Facts from the CV
    info!("Extracting CV facts");
    let facts = extract_facts(llm, &inputs.cv).await?;

    // Step 2: Job description summary
    info!("Summarizing job description");
    let job_summary = summarize_job(llm, &inputs.job_description).await?;

    // Step 3: Draft
    info!("Drafting letter");
    let example_text = inputs.example_letter.as_ref().map(SourceDocument::raw_text);
    let draft = draft_letter(llm, &facts, &job_summary, example_text).await?;

    // Step 4: Advisory verification
    info!("Verifying letter against facts");
    let mut warnings = Vec::new();
    let verification = match verify_letter(llm, &draft, &facts).await {
        Ok(result) => {
            if !result.is_clean() {
                warnings.push(format!(
                    "{} sentence(s) may not be supported by the CV. Review them before sending.",
                    result.flagged_lines().len()
                ));
            }
            Some(result)
        }
        Err(e) => {
            warn!("{e}");
            warnings.push(format!("Verification could not run: {e}"));
            None
        }
    };

    // Step 5: Local grounding check
    let ungrounded_terms = ungrounded_terms(&draft.body_text, &facts, &job_summary);
    if !ungrounded_terms.is_empty() {
        warnings.push(format!(
            "Terms not found in the CV facts: {}",
            ungrounded_terms.join(", ")
        ));
    }

    info!("Letter run finished with {} warning(s)", warnings.len());

    Ok(LetterOutcome {
        facts,
        job_summary,
        draft,
        verification,
        ungrounded_terms,
        warnings,
    })
}
