use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::dates::{analyze_dates, DateReport};
use crate::analysis::redact::mask_pii;
use crate::analysis::sections::{view, AnalysisView};
use crate::errors::AppError;
use crate::extraction::{detect, extract_document, ExtractedDocument};
use crate::providers::AnalysisRequest;
use crate::state::AppState;

/// Shortest resume text, in characters after trimming, worth analyzing.
pub const MIN_TEXT_CHARS: usize = 50;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub sections: AnalysisView,
    pub date_check: DateReport,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub analysis: String,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if req.text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(AppError::Validation(
            "Yetersiz metin. En az 50 karakter sağlayın.".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let date_check = analyze_dates(&req.text, today);

    let text = if state.config.mask_pii && state.provider.is_hosted() {
        mask_pii(&req.text)
    } else {
        req.text
    };
    let role = req
        .role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    let request = AnalysisRequest { text, role };

    let reply = state.provider.generate(&request, today).await?;
    let sections = view(&reply.text);

    info!(
        provider = reply.provider,
        model = reply.model.as_deref().unwrap_or("-"),
        structured = matches!(sections, AnalysisView::Sections(_)),
        future_ranges = date_check.future_ranges.len(),
        "analysis completed"
    );

    Ok(Json(AnalyzeResponse {
        analysis: reply.text,
        provider: reply.provider,
        model: reply.model,
        sections,
        date_check,
    }))
}

/// POST /api/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Json<AnalysisView> {
    Json(view(&req.analysis))
}

/// POST /api/extract
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractedDocument>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let kind = detect(field.content_type(), field.file_name());
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let document = tokio::task::spawn_blocking(move || extract_document(kind, &bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

        info!(
            kind = ?document.kind,
            pages = document.pages,
            characters = document.characters,
            "document extracted"
        );
        return Ok(Json(document));
    }

    Err(AppError::Validation(format!(
        "Çok parçalı istekte '{UPLOAD_FIELD}' alanı bulunamadı."
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}
