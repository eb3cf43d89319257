//! User-selection merge: records the maturity level the user picked per
//! clause and recomputes the practice score from their checkbox ticks.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::assessment::{CalculatedScore, ClauseAssessment};
use crate::state::AppState;

/// The user's selection for one clause. Keys in `practices` are practice
/// indices (as strings, matching the JSON wire format) mapped to whether the
/// checkbox was ticked.
#[derive(Debug, Deserialize)]
pub struct ClauseSelection {
    pub maturity_level: Option<u8>,
    #[serde(default)]
    pub practices: HashMap<String, bool>,
}

/// Selections keyed by clause index into the stored assessment list.
pub type SelectionMap = HashMap<String, ClauseSelection>;

#[derive(Debug, Deserialize)]
pub struct SaveSelectionsRequest {
    pub filename: String,
    #[serde(default)]
    pub selections: SelectionMap,
}

#[derive(Debug, Serialize)]
pub struct SaveSelectionsResponse {
    pub success: bool,
    pub message: String,
    pub assessments: Vec<ClauseAssessment>,
}

/// Merges user selections into the assessments in place. Unparsable or
/// out-of-range clause and practice indices are ignored.
pub fn apply_selections(assessments: &mut [ClauseAssessment], selections: &SelectionMap) {
    for (key, selection) in selections {
        let Ok(index) = key.parse::<usize>() else {
            continue;
        };
        let Some(assessment) = assessments.get_mut(index) else {
            continue;
        };
        let Some(level) = selection.maturity_level else {
            continue;
        };

        assessment.selected_maturity_level = Some(level);

        if selection.practices.is_empty() {
            continue;
        }
        let Some(level_data) = assessment.maturity_levels.iter().find(|ml| ml.level == level)
        else {
            continue;
        };

        let mut total = 0.0;
        let mut max = 0.0;
        for (practice_key, ticked) in &selection.practices {
            let Ok(practice_index) = practice_key.parse::<usize>() else {
                continue;
            };
            let Some(practice) = level_data.practices.get(practice_index) else {
                continue;
            };
            max += practice.score;
            if *ticked {
                total += practice.score;
            }
        }

        assessment.calculated_score = Some(CalculatedScore {
            total,
            max,
            percentage: if max > 0.0 { total / max * 100.0 } else { 0.0 },
        });
    }
}

/// POST /api/v1/selections
///
/// Loads the stored assessment for the document, merges the selections, and
/// writes the result back to the same file.
pub async fn handle_save_selections(
    State(state): State<AppState>,
    Json(request): Json<SaveSelectionsRequest>,
) -> Result<Json<SaveSelectionsResponse>, AppError> {
    if request.filename.is_empty() {
        return Err(AppError::Validation("Filename is required".to_string()));
    }

    let path = state
        .store
        .find_latest_assessment(&request.filename)
        .ok_or_else(|| AppError::NotFound("No existing assessment found".to_string()))?;

    let mut assessments = state.store.load_assessments(&path)?;
    apply_selections(&mut assessments, &request.selections);
    state.store.overwrite(&path, &assessments)?;

    info!(
        "Saved selections for '{}' ({} clauses updated)",
        request.filename,
        request.selections.len()
    );

    Ok(Json(SaveSelectionsResponse {
        success: true,
        message: "Selections saved successfully".to_string(),
        assessments,
    }))
}
