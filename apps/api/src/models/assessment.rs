//! Clause assessment model — the checklist the LLM generates for each clause
//! of an uploaded standard, later annotated with the user's selections.
//!
//! Assessment JSON comes from two untrusted producers: the LLM and files
//! edited out-of-band on disk. Deserialization is therefore lenient:
//! malformed numeric fields coerce to defaults instead of failing the load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An observable, evidence-based practice at a maturity level, carrying a
/// partial-credit weight in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practice {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: f64,
}

/// One of the four maturity level descriptors for a clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityLevel {
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub practices: Vec<Practice>,
}

/// Summary of which practice checkboxes the user ticked for a clause.
/// Invariant (enforced at the point of computation, not here):
/// `percentage == total / max * 100`, or 0 when `max == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatedScore {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
}

/// A single "shall" requirement extracted from the clause text.
/// Internal validation data; not shown to end users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default)]
    pub requirement_id: String,
    #[serde(default)]
    pub requirement_text: String,
    /// "explicit" or "implicit".
    #[serde(default)]
    pub requirement_type: String,
    #[serde(default)]
    pub assessment_questions: Vec<String>,
    #[serde(default)]
    pub mandatory_elements: Vec<String>,
}

/// One clause assessment: identifier plus name (e.g. "7.3 Design and
/// Development"), the extracted requirements, the four maturity level
/// descriptors, and — once the user has worked through the checklist —
/// their selected level and calculated practice score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseAssessment {
    pub clause: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub critical_question: String,
    #[serde(default)]
    pub completeness_statement: String,
    #[serde(default)]
    pub maturity_levels: Vec<MaturityLevel>,
    /// None means "not yet selected"; scoring defaults it to level 1.
    #[serde(default, deserialize_with = "lenient_level")]
    pub selected_maturity_level: Option<u8>,
    #[serde(default, deserialize_with = "lenient_calculated_score")]
    pub calculated_score: Option<CalculatedScore>,
}

impl ClauseAssessment {
    /// The clause number, e.g. "7.3" from "7.3 Design and Development".
    pub fn clause_number(&self) -> &str {
        self.clause.split(' ').next().unwrap_or(&self.clause)
    }

    /// The human name, e.g. "Design and Development". Falls back to the whole
    /// string when there is no name part.
    pub fn clause_name(&self) -> &str {
        self.clause
            .split_once(' ')
            .map(|(_, name)| name)
            .unwrap_or(&self.clause)
    }

    /// The maturity level descriptor for `level`, if the LLM produced one.
    pub fn level_data(&self, level: u8) -> Option<&MaturityLevel> {
        self.maturity_levels.iter().find(|ml| ml.level == level)
    }
}

/// Coerces any non-numeric JSON value to 0.0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(0.0))
}

/// Accepts integers and floats (truncated, Python-style), restricted to the
/// valid 1..=4 range. Anything else is treated as "not selected".
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .map(|f| f.trunc())
        .filter(|l| (1.0..=4.0).contains(l))
        .map(|l| l as u8))
}

/// Accepts only JSON objects; any other shape means "not assessed".
fn lenient_calculated_score<'de, D>(deserializer: D) -> Result<Option<CalculatedScore>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).ok())
    } else {
        Ok(None)
    }
}
