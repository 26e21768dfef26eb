//! Fact Extractor: turns CV text into the list of facts the letter may use.
//!
//! Two completion calls: one for explicit facts, one for the most recent job
//! stations. The model's bullets are accepted as-is; nothing is re-ranked or
//! deduplicated locally.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::SourceDocument;
use crate::errors::AppError;
use crate::letter::prompts::{
    render_prompt, FACTS_PROMPT_TEMPLATE, FACTS_SYSTEM, STATIONS_PROMPT_TEMPLATE,
    STATIONS_SYSTEM,
};
use crate::llm_client::prompts::NO_INFERENCE_INSTRUCTION;
use crate::llm_client::{require_text, CompletionClient, CompletionRequest};

/// How many job stations the extractor asks for.
pub const MAX_RECENT_STATIONS: usize = 3;

const BULLET_MARKERS: &[&str] = &["- ", "* ", "• "];

/// Everything the letter is allowed to say about the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    pub bullet_facts: Vec<String>,
    pub recent_stations: Vec<String>,
}

impl ExtractedFacts {
    /// Facts rendered as a `- ` bullet list, the form every downstream prompt uses.
    pub fn facts_block(&self) -> String {
        bullet_block(&self.bullet_facts)
    }
}

/// Renders items as `- item` lines.
pub fn bullet_block(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts explicit facts and recent job stations from a CV.
pub async fn extract_facts(
    llm: &dyn CompletionClient,
    cv: &SourceDocument,
) -> Result<ExtractedFacts, AppError> {
    info!(
        "Extracting facts from {} ({} chars)",
        cv.kind(),
        cv.raw_text().len()
    );
    let prompt = render_prompt(
        FACTS_PROMPT_TEMPLATE,
        &[
            ("no_inference", NO_INFERENCE_INSTRUCTION),
            ("cv_text", cv.raw_text()),
        ],
    );
    let facts_text = llm
        .complete(&CompletionRequest::new(FACTS_SYSTEM, prompt))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::ExtractionFailed(e.to_string()))?;

    let bullet_facts = parse_bullets(&facts_text);
    if bullet_facts.is_empty() {
        return Err(AppError::ExtractionFailed(
            "No facts extracted. Check the CV input or try a different file.".to_string(),
        ));
    }

    let max_stations = MAX_RECENT_STATIONS.to_string();
    let prompt = render_prompt(
        STATIONS_PROMPT_TEMPLATE,
        &[("max_stations", &max_stations), ("cv_text", cv.raw_text())],
    );
    let stations_text = llm
        .complete(&CompletionRequest::new(STATIONS_SYSTEM, prompt))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::ExtractionFailed(format!("recent job stations: {e}")))?;
    let recent_stations = parse_bullets(&stations_text);

    info!(
        "Extracted {} facts and {} recent job stations",
        bullet_facts.len(),
        recent_stations.len()
    );

    Ok(ExtractedFacts {
        bullet_facts,
        recent_stations,
    })
}

/// Keeps only bulleted lines, with the marker removed.
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            BULLET_MARKERS
                .iter()
                .find_map(|marker| line.strip_prefix(marker))
        })
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
