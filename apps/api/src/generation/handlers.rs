//! Axum route handlers for document analysis.

use axum::{extract::Multipart, extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_pdf_text;
use crate::generation::generator::generate_assessments;
use crate::models::assessment::ClauseAssessment;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Accepts a multipart PDF upload. When an assessment already exists for the
/// document (matched by standard name or filename) it is returned from disk
/// without touching the LLM; otherwise the full pipeline runs: extract →
/// generate section by section → save.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ClauseAssessment>>, AppError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    if let Some(existing) = state.store.find_latest_assessment(&filename) {
        match state.store.load_assessments(&existing) {
            Ok(cached) => {
                info!(
                    "Returning cached assessment for '{filename}' ({} clauses, no new generation)",
                    cached.len()
                );
                return Ok(Json(cached));
            }
            Err(e) => {
                // Corrupted cache file; fall through to regeneration
                tracing::warn!("Failed to load existing assessment for '{filename}': {e}");
            }
        }
    }

    info!("No usable cached assessment for '{filename}', analyzing document");
    let text = extract_pdf_text(&bytes)?;
    if text.trim().len() < 50 {
        return Err(AppError::Validation(
            "PDF seems empty or unreadable".to_string(),
        ));
    }
    info!("Extracted {} characters from '{filename}'", text.len());

    let assessments = generate_assessments(&text, &state.llm).await?;
    state.store.save_assessments(&filename, &assessments)?;
    info!("Generated {} clause assessments for '{filename}'", assessments.len());

    Ok(Json(assessments))
}

/// Pulls the uploaded file out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("No file selected".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}
