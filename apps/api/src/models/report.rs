//! Compliance report model — the aggregate output of scoring a full set of
//! clause assessments against the fixed target of maturity level 4.

use serde::{Deserialize, Serialize};

/// A titled note summarizing one aspect of the user's selection for a clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionNote {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// One ordered step on a clause's path from its current level to level 4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub step: u8,
    pub target_level: u8,
    pub title: String,
    pub description: String,
    /// First four practice texts at the target level.
    pub practices: Vec<String>,
    pub what_to_do: String,
}

/// Structured detail backing a gap record: what the user selected, what is
/// missing at the current level, and the per-clause roadmap to level 4.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapDetails {
    pub user_selection: Vec<SelectionNote>,
    pub missing_at_current_level: Vec<String>,
    pub roadmap_to_level_4: Vec<RoadmapStep>,
    pub current_level_description: String,
    pub level_2_description: String,
    pub level_3_description: String,
    pub level_4_description: String,
}

/// One assessed clause with its gap to the level-4 target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapInfo {
    pub clause: String,
    pub clause_name: String,
    /// Effective level, rounded to one decimal. May sit below the selected
    /// level when practice evidence is incomplete.
    pub current_level: f64,
    pub selected_level: u8,
    pub target_level: u8,
    pub gap_description: String,
    pub score_percentage: f64,
    pub total_score: f64,
    pub max_score: f64,
    /// "High" / "Medium" / "Low".
    pub impact: String,
    /// "Critical" / "High" / "Medium" / "Low".
    pub priority: String,
    pub gap_details: GapDetails,
}

/// Gap records partitioned by gap size. Every assessed clause lands in
/// exactly one bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub critical_gaps: Vec<GapInfo>,
    pub moderate_gaps: Vec<GapInfo>,
    pub minor_gaps: Vec<GapInfo>,
}

/// An actionable recommendation for one gap, with a timeline bucket sized by
/// the gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub clause: String,
    pub clause_name: String,
    pub current_level: f64,
    pub selected_level: u8,
    pub target_level: u8,
    pub action_items: Vec<String>,
    /// "6-12 months" / "3-6 months" / "1-3 months".
    pub timeline: String,
    pub resources_required: String,
}

/// One of the three fixed improvement phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub title: String,
    pub duration: String,
    pub clauses: Vec<String>,
    pub key_actions: Vec<String>,
}

/// Fixed three-phase improvement roadmap, independent of the per-clause
/// roadmaps inside each gap record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub phase_1: RoadmapPhase,
    pub phase_2: RoadmapPhase,
    pub phase_3: RoadmapPhase,
}

/// Clause references bucketed by urgency, as "clause - name" strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityMatrix {
    pub quick_wins: Vec<String>,
    pub strategic_initiatives: Vec<String>,
    pub foundational_requirements: Vec<String>,
}

/// The full compliance report for one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub executive_summary: String,
    /// Overall maturity label, e.g. "Level 2.3".
    pub overall_maturity_score: String,
    pub overall_maturity_numeric: f64,
    /// Combined level/practice score, 0..=100, one decimal.
    pub overall_percentage_score: f64,
    pub total_clauses: usize,
    pub assessed_clauses: Vec<GapInfo>,
    pub gap_analysis: GapAnalysis,
    pub recommendations: Vec<Recommendation>,
    pub roadmap_to_level_4: Roadmap,
    pub priority_matrix: PriorityMatrix,
}
