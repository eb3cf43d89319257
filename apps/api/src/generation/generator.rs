//! Assessment generator — one LLM call per standard section, assembling the
//! audit prompt from carved clause texts and validating clause coverage.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_full_clause_text, find_clause_content, floor_char_boundary};
use crate::generation::prompts::{audit_system, section_prompt};
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::models::assessment::ClauseAssessment;

/// The fixed section layout of ISO 9001 / AS9100 style standards.
pub const SECTIONS: &[(&str, &[&str])] = &[
    ("Section 4", &["4.1", "4.2", "4.3", "4.4"]),
    ("Section 5", &["5.1", "5.2", "5.3"]),
    ("Section 6", &["6.1", "6.2", "6.3"]),
    ("Section 7", &["7.1", "7.2", "7.3", "7.4", "7.5", "7.6"]),
    ("Section 8", &["8.1", "8.2", "8.3", "8.4", "8.5", "8.6", "8.7"]),
    ("Section 9", &["9.1", "9.2", "9.3"]),
    ("Section 10", &["10.1", "10.2", "10.3"]),
];

/// How much general document context accompanies each section prompt.
const CONTEXT_CHARS: usize = 15_000;

/// Generates clause assessments for the whole document, section by section.
/// A failed section is logged and skipped; only a run producing nothing at
/// all is an error.
pub async fn generate_assessments(
    text: &str,
    llm: &LlmClient,
) -> Result<Vec<ClauseAssessment>, AppError> {
    let mut all_assessments = Vec::new();

    for (section_name, clauses) in SECTIONS {
        info!(
            "Generating assessments for {section_name} (clauses: {})",
            clauses.join(", ")
        );

        match generate_section(text, section_name, clauses, llm).await {
            Ok(section_data) => {
                let missing = missing_clauses(clauses, &section_data);
                if missing.is_empty() {
                    info!(
                        "Generated {} clause assessments for {section_name} (all clauses present)",
                        section_data.len()
                    );
                } else {
                    warn!("Missing clauses in {section_name}: {}", missing.join(", "));
                }
                all_assessments.extend(section_data);
            }
            Err(e) => {
                // Keep going; partial coverage beats no assessment at all
                warn!("Failed to generate {section_name}: {e}");
            }
        }
    }

    if all_assessments.is_empty() {
        return Err(AppError::Llm(
            "Failed to generate any assessments".to_string(),
        ));
    }

    let expected: Vec<&str> = SECTIONS.iter().flat_map(|(_, c)| c.iter().copied()).collect();
    let missing = missing_clauses(&expected, &all_assessments);
    if missing.is_empty() {
        info!("All {} expected clauses were generated", expected.len());
    } else {
        warn!(
            "{} of {} expected clauses are missing from the assessment: {}",
            missing.len(),
            expected.len(),
            missing.join(", ")
        );
    }

    Ok(all_assessments)
}

async fn generate_section(
    text: &str,
    section_name: &str,
    clauses: &[&str],
    llm: &LlmClient,
) -> Result<Vec<ClauseAssessment>, AppError> {
    let clause_texts = build_clause_texts(text, clauses);
    let context = &text[..floor_char_boundary(text, CONTEXT_CHARS)];
    let prompt = section_prompt(section_name, clauses, &clause_texts, context);
    let system = audit_system(clauses);

    let response = llm
        .call(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("{section_name} generation failed: {e}")))?;
    let raw = response
        .text()
        .ok_or_else(|| AppError::Llm(format!("{section_name}: LLM returned empty content")))?;

    parse_assessment_json(strip_json_fences(raw))
        .map_err(|e| AppError::Llm(format!("{section_name}: unparsable response: {e}")))
}

/// Concatenates the carved text for each clause, falling back from the full
/// clause window to the short one, then to leading document context.
fn build_clause_texts(text: &str, clauses: &[&str]) -> String {
    let divider = "=".repeat(80);
    clauses
        .iter()
        .map(|clause| {
            if let Some(full) = extract_full_clause_text(text, clause) {
                format!("\n{divider}\nFULL TEXT FOR CLAUSE {clause}:\n{divider}\n{full}\n")
            } else if let Some(window) = find_clause_content(text, clause) {
                format!("\n{divider}\nTEXT FOR CLAUSE {clause}:\n{divider}\n{window}\n")
            } else {
                let head = &text[..floor_char_boundary(text, 2000)];
                format!(
                    "\n{divider}\nCLAUSE {clause} (using general context):\n{divider}\n{head}\n"
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the LLM response as a JSON array of clause assessments. When the
/// response was truncated mid-array, salvages everything up to the last
/// closing bracket.
pub fn parse_assessment_json(text: &str) -> Result<Vec<ClauseAssessment>, serde_json::Error> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => from_assessment_value(value),
        Err(original) => {
            if let Some(last_bracket) = text.rfind(']') {
                let fixed = &text[..=last_bracket];
                if let Ok(value) = serde_json::from_str::<Value>(fixed) {
                    warn!("Salvaged truncated assessment JSON ({} bytes kept)", fixed.len());
                    return from_assessment_value(value);
                }
            }
            Err(original)
        }
    }
}

fn from_assessment_value(value: Value) -> Result<Vec<ClauseAssessment>, serde_json::Error> {
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        // Single clause object; normalize to a one-element list
        serde_json::from_value(value).map(|a| vec![a])
    }
}

/// Expected clause numbers not present in the generated assessments.
pub fn missing_clauses(expected: &[&str], assessments: &[ClauseAssessment]) -> Vec<String> {
    let generated: Vec<&str> = assessments.iter().map(|a| a.clause_number()).collect();
    expected
        .iter()
        .filter(|c| !generated.contains(*c))
        .map(|c| c.to_string())
        .collect()
}
