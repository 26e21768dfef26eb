//! Job Summarizer: extracts company, role and requirements from a job description.
//!
//! The model is asked for JSON but its answer is parsed leniently: code fences
//! are stripped, a JSON object embedded in prose is recovered, and as a last
//! resort the raw lines become the requirements list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::documents::SourceDocument;
use crate::errors::AppError;
use crate::letter::facts::bullet_block;
use crate::letter::prompts::{render_prompt, JOB_SUMMARY_PROMPT_TEMPLATE, JOB_SUMMARY_SYSTEM};
use crate::llm_client::{require_text, strip_json_fences, CompletionClient, CompletionRequest};

/// Stands in for a company or role the job description does not name.
pub const NOT_FOUND: &str = "[not found]";

const MAX_FALLBACK_REQUIREMENTS: usize = 10;
const BULLET_CHARS: &[char] = &['-', '•', '·', '‧', '▪', '●'];
const STRUCTURAL_LINES: &[&str] = &["{", "}", "[", "]"];
const JSON_KEYS: &[&str] = &[
    "company_name",
    "role_title",
    "requirements",
    "contact_person",
];

/// What the letter needs to know about the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub company: String,
    pub role: String,
    pub requirements: Vec<String>,
    pub contact_person: Option<String>,
}

impl JobSummary {
    /// Summary as the labeled text block the drafting prompt embeds.
    pub fn prompt_block(&self) -> String {
        let mut block = format!("Company: {}\nRole: {}\n", self.company, self.role);
        if let Some(contact) = &self.contact_person {
            block.push_str(&format!("Contact person: {contact}\n"));
        }
        if self.requirements.is_empty() {
            block.push_str(&format!("Requirements: {NOT_FOUND}"));
        } else {
            block.push_str("Requirements:\n");
            block.push_str(&bullet_block(&self.requirements));
        }
        block
    }
}

/// Summarizes a job description with one completion call.
pub async fn summarize_job(
    llm: &dyn CompletionClient,
    job_description: &SourceDocument,
) -> Result<JobSummary, AppError> {
    let prompt = render_prompt(
        JOB_SUMMARY_PROMPT_TEMPLATE,
        &[("jd_text", job_description.raw_text())],
    );
    let response = llm
        .complete(&CompletionRequest::new(JOB_SUMMARY_SYSTEM, prompt))
        .await
        .and_then(require_text)
        .map_err(|e| AppError::SummarizationFailed(e.to_string()))?;

    let summary = parse_job_summary(&response);
    info!(
        "Job summary: {} requirements, company found: {}, role found: {}",
        summary.requirements.len(),
        summary.company != NOT_FOUND,
        summary.role != NOT_FOUND
    );
    Ok(summary)
}

/// Never fails: anything unparseable degrades to placeholders and raw lines.
pub fn parse_job_summary(response: &str) -> JobSummary {
    match parse_json_object(response) {
        Some(value) => JobSummary {
            company: string_field(&value, "company_name").unwrap_or_else(|| NOT_FOUND.into()),
            role: string_field(&value, "role_title").unwrap_or_else(|| NOT_FOUND.into()),
            requirements: normalize_requirements(value.get("requirements")),
            contact_person: string_field(&value, "contact_person"),
        },
        None => {
            warn!("Job summary was not valid JSON; using raw lines as requirements");
            JobSummary {
                company: NOT_FOUND.into(),
                role: NOT_FOUND.into(),
                requirements: fallback_requirements(response),
                contact_person: None,
            }
        }
    }
}

fn parse_json_object(response: &str) -> Option<Value> {
    let cleaned = strip_json_fences(response);
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }
    // The model sometimes wraps the object in prose; take the outermost braces.
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(String::from)
}

/// Accepts a JSON list or a newline-separated string; strips bullet markers.
fn normalize_requirements(requirements: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match requirements {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::String(text)) => text.lines().map(String::from).collect(),
        _ => Vec::new(),
    };

    items
        .iter()
        .map(|item| item.trim().trim_start_matches(BULLET_CHARS).trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn fallback_requirements(response: &str) -> Vec<String> {
    response
        .lines()
        .map(|raw| raw.trim().trim_matches(',').trim())
        .filter(|line| !line.is_empty() && !STRUCTURAL_LINES.contains(line))
        .map(|line| strip_key_prefix(line.trim_matches('"')))
        .filter(|line| !line.is_empty())
        .take(MAX_FALLBACK_REQUIREMENTS)
        .collect()
}

fn strip_key_prefix(line: &str) -> String {
    let lower = line.to_ascii_lowercase();
    for key in JSON_KEYS {
        if let Some(rest) = lower.strip_prefix(key) {
            let rest = rest.trim_start_matches('"').trim_start();
            if let Some(colon_rest) = rest.strip_prefix(':') {
                let value_start = line.len() - colon_rest.len();
                return line[value_start..].trim().trim_matches('"').to_string();
            }
        }
    }
    line.to_string()
}
