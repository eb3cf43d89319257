// All LLM prompt constants for the assessment generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ARRAY_ONLY;

/// System prompt for assessment generation — an ISO lead auditor persona
/// with a strict extraction procedure. `{clause_count}` and `{clauses}` are
/// replaced before sending.
pub const AUDIT_SYSTEM_TEMPLATE: &str = r#"You are a strict ISO 9001/AS9100 Lead Auditor conducting a certification audit.

MANDATORY PROCESS:

1. PARSE CLAUSES LINE-BY-LINE
   - Read EVERY line of the clause text provided
   - Extract EVERY "shall" requirement
   - Extract EVERY sub-clause with its EXACT numbering from the document (e.g. 7.3.1, 7.3.2)
   - Use the document's numbered structure, never letters (a, b, c)
   - Do NOT merge, combine, or skip ANY requirement

2. CREATE ASSESSMENT QUESTIONS FOR EACH REQUIREMENT
   - Verify AWARENESS: does the organization know about the requirement?
   - Verify UNDERSTANDING: does the organization understand it?
   - Verify APPLICATION: is it implemented?
   - Cover product/service conformity, safety, ethics, and consequences where applicable

3. COMPLETENESS CHECK
   - Verify EVERY "shall" statement and sub-clause has an assessment
   - State "All clause requirements are fully assessed" in completeness_statement
     (internal validation only, never shown to users)

4. MATURITY LEVELS
   - Four levels per clause describing capability progression, not rephrased requirements
   - Practices must be brief, concrete, observable organizational evidence
   - No repetition between assessment questions, critical question, level
     descriptions, and practices

You MUST generate assessments for ALL {clause_count} clauses: {clauses}.
"#;

/// Per-section user prompt. Placeholders: `{section_name}`, `{clauses}`,
/// `{first_clause}`, `{clause_texts}`, `{document_context}`.
pub const SECTION_PROMPT_TEMPLATE: &str = r#"Create a COMPLETE, AUDIT-READY assessment for {section_name} clauses: {clauses}.

The output must be a JSON ARRAY with one object per clause, in this EXACT schema:

[
  {
    "clause": "{first_clause} <clause title exactly as in the document>",
    "requirements": [
      {
        "requirement_id": "{first_clause}",
        "requirement_text": "The organization shall ...",
        "requirement_type": "explicit",
        "assessment_questions": [
          "Is the organization aware of this requirement?",
          "Does the organization understand what it must include?",
          "Is the requirement actually implemented and maintained?"
        ],
        "mandatory_elements": ["conformity", "consequences"]
      }
    ],
    "critical_question": "<one high-level yes/no compliance question for the whole clause>",
    "completeness_statement": "All clause requirements are fully assessed. Total requirements identified: <number>",
    "maturity_levels": [
      {
        "level": 1,
        "description": "<what this maturity level means for THIS clause>",
        "practices": [
          {"text": "<observable organizational evidence, 1-2 lines>", "score": 0.5}
        ]
      }
    ]
  }
]

RULES:
- One requirement object per "shall" statement and per numbered sub-clause,
  using the EXACT numbering from the document (7.3.1, 7.3.2 — never 7.3 a).
- The critical_question is user-facing and must not repeat assessment
  question wording.
- Each of the 4 maturity levels carries 6 practices written as evidence
  ("The organization has documented ...", "A register is maintained ...",
  "Records show that ..."), each with a score between 0.0 and 1.0.
- Practices must differ between levels and show clear progression. Never use
  generic statements such as "processes are documented".

FULL CLAUSE TEXTS:
{clause_texts}

GENERAL DOCUMENT CONTEXT:
{document_context}

Now parse each clause line-by-line and generate complete assessments for
ALL clauses: {clauses}.
"#;

/// Builds the system prompt for one section.
pub fn audit_system(clauses: &[&str]) -> String {
    format!(
        "{}\n{}",
        AUDIT_SYSTEM_TEMPLATE
            .replace("{clause_count}", &clauses.len().to_string())
            .replace("{clauses}", &clauses.join(", ")),
        JSON_ARRAY_ONLY
    )
}

/// Builds the user prompt for one section from the carved clause texts.
pub fn section_prompt(
    section_name: &str,
    clauses: &[&str],
    clause_texts: &str,
    document_context: &str,
) -> String {
    SECTION_PROMPT_TEMPLATE
        .replace("{section_name}", section_name)
        .replace("{clauses}", &clauses.join(", "))
        .replace("{first_clause}", clauses.first().unwrap_or(&""))
        .replace("{clause_texts}", clause_texts)
        .replace("{document_context}", document_context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_system_substitutes_clause_list() {
        let system = audit_system(&["4.1", "4.2"]);
        assert!(system.contains("ALL 2 clauses: 4.1, 4.2"));
        assert!(system.contains("JSON array"));
        assert!(!system.contains("{clause_count}"));
    }

    #[test]
    fn test_section_prompt_substitutes_all_placeholders() {
        let prompt = section_prompt("Section 4", &["4.1", "4.2"], "CLAUSE TEXT", "CONTEXT");
        assert!(prompt.contains("Section 4 clauses: 4.1, 4.2"));
        assert!(prompt.contains("CLAUSE TEXT"));
        assert!(prompt.contains("CONTEXT"));
        assert!(prompt.contains(r#""clause": "4.1 <clause title"#));
        assert!(!prompt.contains("{section_name}"));
        assert!(!prompt.contains("{first_clause}"));
    }
}
