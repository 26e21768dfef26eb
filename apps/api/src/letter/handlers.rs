//! Axum route handlers for the Letter API.

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::documents::loader::{pick_input, Upload};
use crate::documents::DocumentKind;
use crate::errors::AppError;
use crate::letter::drafter::DraftLetter;
use crate::letter::facts::ExtractedFacts;
use crate::letter::job_summary::JobSummary;
use crate::letter::pipeline::{generate_letter, LetterInputs};
use crate::letter::reviser::revise_letter;
use crate::letter::session::Session;
use crate::letter::verifier::VerificationResult;
use crate::state::AppState;

const DOWNLOAD_FILE_NAME: &str = "application_letter.txt";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LetterQuery {
    /// `txt` (or `text`) returns the letter alone as a download.
    pub format: Option<String>,
}

impl LetterQuery {
    fn wants_text(&self) -> bool {
        matches!(
            self.format.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("txt" | "text")
        )
    }
}

/// Uploaded documents of one request, before decoding.
#[derive(Debug, Default)]
struct DocumentForm {
    cv: Option<Upload>,
    job_description: Option<Upload>,
    job_description_text: Option<String>,
    example_letter: Option<Upload>,
}

#[derive(Debug, Serialize)]
pub struct LetterResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub recent_stations: Vec<String>,
    pub facts: Vec<String>,
    pub job_summary: JobSummary,
    pub letter: String,
    pub verification: Option<VerificationResult>,
    pub ungrounded_terms: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub api_key: Option<String>,
    pub letter: String,
    pub facts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviseResponse {
    pub letter: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/letters
///
/// Multipart fields: `api_key`, `cv`, `job_description` or
/// `job_description_text`, optional `example_letter`.
pub async fn handle_generate_letter(
    State(state): State<AppState>,
    Query(query): Query<LetterQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (api_key, documents) = read_form(multipart).await?;
    let session = Session::open(api_key, &state.config)?;

    // PDF extraction is CPU-bound; keep it off the async workers.
    let inputs = tokio::task::spawn_blocking(move || load_inputs(documents))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let run_id = Uuid::new_v4();
    let outcome = generate_letter(session.completion(), &inputs, run_id).await?;
    info!("Letter run {run_id} complete");

    if query.wants_text() {
        return Ok(text_download(outcome.draft.body_text));
    }

    Ok(Json(LetterResponse {
        run_id,
        generated_at: Utc::now(),
        recent_stations: outcome.facts.recent_stations,
        facts: outcome.facts.bullet_facts,
        job_summary: outcome.job_summary,
        letter: outcome.draft.body_text,
        verification: outcome.verification,
        ungrounded_terms: outcome.ungrounded_terms,
        warnings: outcome.warnings,
    })
    .into_response())
}

/// POST /api/v1/letters/revise
///
/// Strict-editor pass over a letter the user already has. Never called by
/// the generation pipeline itself.
pub async fn handle_revise_letter(
    State(state): State<AppState>,
    Json(request): Json<ReviseRequest>,
) -> Result<Json<ReviseResponse>, AppError> {
    let session = Session::open(request.api_key, &state.config)?;
    if request.letter.trim().is_empty() {
        return Err(AppError::Validation("letter cannot be empty".to_string()));
    }

    let facts = ExtractedFacts {
        bullet_facts: request.facts,
        recent_stations: Vec::new(),
    };
    let letter = DraftLetter {
        body_text: request.letter,
    };
    let revised = revise_letter(session.completion(), &letter, &facts).await?;

    Ok(Json(ReviseResponse {
        letter: revised.body_text,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<(Option<String>, DocumentForm), AppError> {
    let mut api_key = None;
    let mut form = DocumentForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "api_key" => api_key = Some(field.text().await?),
            "job_description_text" => form.job_description_text = Some(field.text().await?),
            "cv" | "job_description" | "example_letter" => {
                let file_name = field.file_name().map(String::from);
                let bytes = field.bytes().await?;
                // Browsers send an empty part for an untouched file input.
                let upload = (!bytes.is_empty()).then_some(Upload { file_name, bytes });
                match name.as_str() {
                    "cv" => form.cv = upload,
                    "job_description" => form.job_description = upload,
                    _ => form.example_letter = upload,
                }
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok((api_key, form))
}

fn load_inputs(form: DocumentForm) -> Result<LetterInputs, AppError> {
    let cv = pick_input(DocumentKind::Cv, None, form.cv.as_ref())?
        .ok_or_else(|| AppError::Validation("CV input is empty.".to_string()))?;
    let job_description = pick_input(
        DocumentKind::JobDescription,
        form.job_description_text.as_deref(),
        form.job_description.as_ref(),
    )?
    .ok_or_else(|| AppError::Validation("Job description input is empty.".to_string()))?;
    let example_letter = pick_input(
        DocumentKind::ExampleLetter,
        None,
        form.example_letter.as_ref(),
    )?;

    Ok(LetterInputs {
        cv,
        job_description,
        example_letter,
    })
}

fn text_download(letter: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        letter,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(name: &str, body: &'static [u8]) -> Option<Upload> {
        Some(Upload {
            file_name: Some(name.to_string()),
            bytes: Bytes::from_static(body),
        })
    }

    #[test]
    fn test_wants_text_formats() {
        let query = |f: Option<&str>| LetterQuery {
            format: f.map(String::from),
        };
        assert!(query(Some("txt")).wants_text());
        assert!(query(Some("TEXT")).wants_text());
        assert!(!query(Some("json")).wants_text());
        assert!(!query(None).wants_text());
    }

    #[test]
    fn test_load_inputs_prefers_pasted_job_description() {
        let form = DocumentForm {
            cv: upload("cv.txt", b"John Doe. Skills: Go."),
            job_description: upload("jd.txt", b"Uploaded JD"),
            job_description_text: Some("Pasted JD".to_string()),
            example_letter: None,
        };
        let inputs = load_inputs(form).unwrap();
        assert_eq!(inputs.job_description.raw_text(), "Pasted JD");
        assert!(inputs.example_letter.is_none());
    }

    #[test]
    fn test_load_inputs_requires_cv_and_job_description() {
        let err = load_inputs(DocumentForm::default()).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: CV input is empty.");

        let form = DocumentForm {
            cv: upload("cv.txt", b"John Doe"),
            ..DocumentForm::default()
        };
        let err = load_inputs(form).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Job description input is empty."
        );
    }

    #[test]
    fn test_text_download_headers() {
        let response = text_download("Dear Hiring Manager".to_string());
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"application_letter.txt\""
        );
    }
}
