//! Axum route handlers for the resume analyzer.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::career::analyzer::{analyze_resume, ResumeAnalysis};
use crate::career::extract::{extract_text, DocumentKind, ExtractError};
use crate::errors::AppError;
use crate::state::AppState;

type AnalysisResponse = ([(&'static str, &'static str); 1], Json<ResumeAnalysis>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
}

struct UploadedResume {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Unsupported => AppError::UnsupportedMediaType(e.to_string()),
            _ => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(e.body_text())
    }
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("jobDescription is required".to_string()));
    }
    Ok(())
}

async fn run_analysis(
    state: &AppState,
    resume_text: &str,
    job_description: &str,
) -> Result<AnalysisResponse, AppError> {
    let result = analyze_resume(state.llm.as_ref(), resume_text, job_description)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok((
        [("x-analysis-origin", result.origin.as_str())],
        Json(result.analysis),
    ))
}

/// POST /api/ai/analyze-resume
///
/// Multipart form: `resume` (PDF, DOCX or text file) and `jobDescription`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<AnalysisResponse, AppError> {
    let mut upload: Option<UploadedResume> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(UploadedResume {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("jobDescription") => {
                job_description = field.text().await.map_err(multipart_error)?;
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    require_job_description(&job_description)?;

    if upload.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge);
    }

    let kind = DocumentKind::detect(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
        &upload.bytes,
    )
    .ok_or(ExtractError::Unsupported)?;

    info!(
        "User {} uploaded resume {:?} ({:?}, {} bytes)",
        user.id,
        upload.file_name,
        kind,
        upload.bytes.len()
    );

    let bytes = upload.bytes;
    let resume_text = tokio::task::spawn_blocking(move || extract_text(kind, &bytes))
        .await
        .map_err(|e| {
            error!("Resume extraction task failed: {e}");
            AppError::UnprocessableEntity("could not read the uploaded document".to_string())
        })??;

    run_analysis(&state, &resume_text, &job_description).await
}

/// POST /api/ai/analyze-resume/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<AnalysisResponse, AppError> {
    if req.resume.trim().is_empty() {
        return Err(AppError::Validation("resume is required".to_string()));
    }
    require_job_description(&req.job_description)?;

    run_analysis(&state, &req.resume, &req.job_description).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_extract_errors_map_to_statuses() {
        let unsupported = AppError::from(ExtractError::Unsupported).into_response();
        assert_eq!(unsupported.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let empty = AppError::from(ExtractError::Empty).into_response();
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let pdf = AppError::from(ExtractError::Pdf("bad xref".into())).into_response();
        assert_eq!(pdf.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_text_request_reads_camel_case() {
        let req: AnalyzeTextRequest =
            serde_json::from_str(r#"{"resume": "Jane", "jobDescription": "Rust dev"}"#).unwrap();
        assert_eq!(req.job_description, "Rust dev");
    }

    #[test]
    fn test_blank_job_description_rejected() {
        assert!(require_job_description("  ").is_err());
        assert!(require_job_description("Rust dev").is_ok());
    }
}
