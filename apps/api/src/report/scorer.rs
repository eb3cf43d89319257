//! Compliance scorer — turns a list of clause assessments into a weighted
//! compliance report with gap analysis, recommendations, a three-phase
//! roadmap, and a priority matrix.
//!
//! Pure and deterministic: no I/O, no clock, no randomness. Malformed input
//! never fails a scoring run; every defect is corrected locally by
//! defaulting (unselected level → 1, missing score → 0, missing level data →
//! roadmap step omitted).

use std::sync::Arc;

use crate::models::assessment::ClauseAssessment;
use crate::models::report::{
    ComplianceReport, GapAnalysis, GapDetails, GapInfo, PriorityMatrix, Recommendation, Roadmap,
    RoadmapPhase, RoadmapStep, SelectionNote,
};

/// The fixed maturity target every clause is measured against.
const TARGET_LEVEL: u8 = 4;

/// The scorer seam. `AppState` holds an `Arc<dyn ComplianceScorer>` so the
/// scoring backend can be swapped without touching handlers.
pub trait ComplianceScorer: Send + Sync {
    fn score(&self, assessments: &[ClauseAssessment]) -> ComplianceReport;
}

/// Default scorer: effective-level dampening by practice evidence, weighted
/// practice percentage across all clauses, 60/40 combined score.
pub struct MaturityWeightedScorer;

impl ComplianceScorer for MaturityWeightedScorer {
    fn score(&self, assessments: &[ClauseAssessment]) -> ComplianceReport {
        generate_compliance_report(assessments)
    }
}

pub fn default_scorer() -> Arc<dyn ComplianceScorer> {
    Arc::new(MaturityWeightedScorer)
}

/// Scores every clause assessment against the level-4 target and aggregates
/// the result into a single report. An empty input yields the documented
/// default report (Level 1.0, 0%, no gaps) rather than an error.
pub fn generate_compliance_report(assessments: &[ClauseAssessment]) -> ComplianceReport {
    let mut total_practice_score = 0.0;
    let mut total_practice_max = 0.0;
    let mut total_effective_level = 0.0;

    let mut assessed_clauses = Vec::with_capacity(assessments.len());
    let mut critical_gaps = Vec::new();
    let mut moderate_gaps = Vec::new();
    let mut minor_gaps = Vec::new();

    for assessment in assessments {
        // Bucketing and aggregation use the unrounded effective level; the
        // rounded value only appears in the serialized gap record.
        let (gap_info, effective_level) = score_clause(assessment);

        if gap_info.max_score > 0.0 {
            total_practice_score += gap_info.total_score;
            total_practice_max += gap_info.max_score;
        }
        total_effective_level += effective_level;

        let gap = TARGET_LEVEL as f64 - effective_level;
        assessed_clauses.push(gap_info.clone());
        if gap >= 2.5 {
            critical_gaps.push(gap_info);
        } else if gap >= 1.5 {
            moderate_gaps.push(gap_info);
        } else {
            minor_gaps.push(gap_info);
        }
    }

    let clause_count = assessments.len();
    let (overall_maturity_score, overall_maturity_numeric, overall_percentage_score) =
        if clause_count > 0 {
            let avg_level = total_effective_level / clause_count as f64;
            let overall_percentage = if total_practice_max > 0.0 {
                total_practice_score / total_practice_max * 100.0
            } else {
                0.0
            };
            let combined = (avg_level / TARGET_LEVEL as f64 * 100.0) * 0.6 + overall_percentage * 0.4;
            (
                format!("Level {avg_level:.1}"),
                round2(avg_level),
                round1(combined),
            )
        } else {
            ("Level 1.0".to_string(), 1.0, 0.0)
        };

    let recommendations = build_recommendations(&critical_gaps, &moderate_gaps, &minor_gaps);
    let roadmap_to_level_4 = build_roadmap(&critical_gaps, &moderate_gaps, &minor_gaps);
    let priority_matrix = build_priority_matrix(&critical_gaps, &moderate_gaps, &minor_gaps);
    let executive_summary = build_executive_summary(
        &overall_maturity_score,
        overall_percentage_score,
        clause_count,
        &critical_gaps,
        &moderate_gaps,
        &minor_gaps,
    );

    ComplianceReport {
        executive_summary,
        overall_maturity_score,
        overall_maturity_numeric,
        overall_percentage_score,
        total_clauses: clause_count,
        assessed_clauses,
        gap_analysis: GapAnalysis {
            critical_gaps,
            moderate_gaps,
            minor_gaps,
        },
        recommendations,
        roadmap_to_level_4,
        priority_matrix,
    }
}

/// Scores a single clause: effective level, gap classification, selection
/// summary, and the per-clause roadmap to level 4. Returns the gap record
/// together with the unrounded effective level.
fn score_clause(assessment: &ClauseAssessment) -> (GapInfo, f64) {
    let selected = assessment.selected_maturity_level;
    let current_level = selected.unwrap_or(1);

    let (total_score, max_score, score_percentage) = assessment
        .calculated_score
        .as_ref()
        .map(|s| (s.total, s.max, s.percentage))
        .unwrap_or((0.0, 0.0, 0.0));

    // A selected level only counts in full when the practice evidence backs
    // it up: under 50% completion costs half a level, under 75% a quarter.
    let current = current_level as f64;
    let effective_level = if current_level > 1 && score_percentage < 50.0 {
        (current - 0.5).max(1.0)
    } else if current_level > 1 && score_percentage < 75.0 {
        current - 0.25
    } else {
        current
    };

    let gap = TARGET_LEVEL as f64 - effective_level;

    let current_data = assessment.level_data(current_level);
    let current_description = current_data.map(|d| d.description.clone()).unwrap_or_default();

    let mut user_selection = Vec::new();
    match selected {
        None => user_selection.push(SelectionNote {
            title: "Your Selection".to_string(),
            content: "No maturity level has been selected. Default status: Level 1.".to_string(),
            level: Some(1),
            percentage: None,
        }),
        Some(level) => user_selection.push(SelectionNote {
            title: "Your Selection".to_string(),
            content: format!("You selected Level {level}. {current_description}"),
            level: Some(level),
            percentage: None,
        }),
    }
    if max_score > 0.0 && score_percentage > 0.0 {
        user_selection.push(SelectionNote {
            title: "Practice Completion".to_string(),
            content: format!(
                "You have completed {score_percentage:.1}% of practices ({total_score:.2} out of {max_score:.2} points)."
            ),
            level: None,
            percentage: Some(score_percentage),
        });
    } else {
        user_selection.push(SelectionNote {
            title: "Practice Completion".to_string(),
            content: "Practices have not been assessed or completed yet.".to_string(),
            level: None,
            percentage: Some(0.0),
        });
    }

    let mut missing_at_current_level = Vec::new();
    if let Some(data) = current_data {
        if score_percentage < 100.0 && !data.practices.is_empty() {
            missing_at_current_level
                .push(format!("Complete remaining practices for Level {current_level}"));
            missing_at_current_level
                .push(format!("Ensure all Level {current_level} practices are implemented"));
        }
    }

    let roadmap_to_level_4 = build_clause_roadmap(assessment, effective_level);

    let mut description_parts = Vec::new();
    if selected.is_some() {
        description_parts.push(format!("You selected Level {current_level}."));
        if !current_description.is_empty() {
            description_parts.push(format!("Current state: {current_description}"));
        }
    } else {
        description_parts.push("No maturity level selected. Default: Level 1.".to_string());
    }
    if max_score > 0.0 {
        if score_percentage == 0.0 {
            description_parts.push("No practices completed.".to_string());
        } else {
            description_parts.push(format!("Practice completion: {score_percentage:.1}%."));
        }
    } else {
        description_parts.push("Practices not assessed.".to_string());
    }

    let level_description =
        |level: u8| assessment.level_data(level).map(|d| d.description.clone()).unwrap_or_default();

    let gap_info = GapInfo {
        clause: assessment.clause_number().to_string(),
        clause_name: assessment.clause_name().to_string(),
        current_level: round1(effective_level),
        selected_level: current_level,
        target_level: TARGET_LEVEL,
        gap_description: description_parts.join(" "),
        score_percentage: round1(score_percentage),
        total_score: round2(total_score),
        max_score: round2(max_score),
        impact: if gap >= 2.5 {
            "High"
        } else if gap >= 1.5 {
            "Medium"
        } else {
            "Low"
        }
        .to_string(),
        priority: if gap >= 2.5 {
            "Critical"
        } else if gap >= 1.5 {
            "High"
        } else if gap >= 0.5 {
            "Medium"
        } else {
            "Low"
        }
        .to_string(),
        gap_details: GapDetails {
            user_selection,
            missing_at_current_level,
            roadmap_to_level_4,
            current_level_description: current_description,
            level_2_description: level_description(2),
            level_3_description: level_description(3),
            level_4_description: level_description(4),
        },
    };

    (gap_info, effective_level)
}

/// Up to three ordered steps toward level 4. A target level contributes a
/// step only when the clause's effective level sits below it and the LLM
/// produced a descriptor for it; step numbers stay sequential from 1 across
/// whatever remains.
fn build_clause_roadmap(assessment: &ClauseAssessment, effective_level: f64) -> Vec<RoadmapStep> {
    let mut steps = Vec::new();

    for target in [2u8, 3, 4] {
        if effective_level >= target as f64 {
            continue;
        }
        let Some(data) = assessment.level_data(target) else {
            continue;
        };

        let practice_texts: Vec<String> =
            data.practices.iter().take(4).map(|p| p.text.clone()).collect();
        let top_three = data
            .practices
            .iter()
            .take(3)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let step = steps.len() as u8 + 1;
        let title = if target == TARGET_LEVEL {
            format!("Step {step}: Reach Level {target} (Target)")
        } else {
            format!("Step {step}: Advance to Level {target}")
        };

        steps.push(RoadmapStep {
            step,
            target_level: target,
            title,
            description: data.description.clone(),
            practices: practice_texts,
            what_to_do: format!("Implement Level {target} practices: {top_three}"),
        });
    }

    steps
}

/// One recommendation per gap record, critical gaps first. Action items use
/// the generic level-threshold phrasing; nothing upstream populates
/// structured action lists, so this is the only path.
fn build_recommendations(
    critical: &[GapInfo],
    moderate: &[GapInfo],
    minor: &[GapInfo],
) -> Vec<Recommendation> {
    critical
        .iter()
        .chain(moderate.iter())
        .chain(minor.iter())
        .map(|gap| {
            let gap_size = gap.target_level as f64 - gap.current_level;

            let mut action_items = Vec::new();
            if gap.selected_level < 2 {
                action_items.push(format!(
                    "Immediate: Select and implement Level 2 maturity for {}",
                    gap.clause_name
                ));
            }
            if gap.selected_level < 3 {
                action_items.push(
                    "Short-term: Advance to Level 3 by implementing standardized frameworks"
                        .to_string(),
                );
            }
            if gap.selected_level < 4 {
                action_items.push(
                    "Long-term: Achieve Level 4 maturity through automation and optimization"
                        .to_string(),
                );
            }
            if action_items.is_empty() {
                if gap.current_level < 2.0 {
                    action_items.push(format!(
                        "Establish basic documentation and processes for {} to reach Level 2.",
                        gap.clause_name
                    ));
                }
                if gap.current_level < 3.0 {
                    action_items.push(format!(
                        "Develop standardized frameworks and integrate {} into planning processes to reach Level 3.",
                        gap.clause_name
                    ));
                }
                if gap.current_level < 4.0 {
                    action_items.push(format!(
                        "Implement automation and continuous improvement for {} to reach Level 4.",
                        gap.clause_name
                    ));
                }
            }

            let timeline = if gap_size >= 2.5 {
                "6-12 months"
            } else if gap_size >= 1.5 {
                "3-6 months"
            } else {
                "1-3 months"
            };

            Recommendation {
                clause: gap.clause.clone(),
                clause_name: gap.clause_name.clone(),
                current_level: gap.current_level,
                selected_level: gap.selected_level,
                target_level: gap.target_level,
                action_items,
                timeline: timeline.to_string(),
                resources_required: format!(
                    "Training, documentation tools, process improvement resources, and management commitment for {}.",
                    gap.clause_name
                ),
            }
        })
        .collect()
}

/// The fixed three-phase roadmap: narrow focus first, widening to every
/// clause with any gap by phase 3.
fn build_roadmap(critical: &[GapInfo], moderate: &[GapInfo], minor: &[GapInfo]) -> Roadmap {
    let clause_ids = |gaps: &[GapInfo]| gaps.iter().map(|g| g.clause.clone()).collect::<Vec<_>>();

    Roadmap {
        phase_1: RoadmapPhase {
            title: "Foundation (Level 1 to Level 2)".to_string(),
            duration: "3-6 months".to_string(),
            clauses: critical
                .iter()
                .take(5)
                .chain(moderate.iter().take(3))
                .map(|g| g.clause.clone())
                .collect(),
            key_actions: vec![
                "Document basic processes and procedures".to_string(),
                "Establish foundational documentation".to_string(),
                "Identify key stakeholders and requirements".to_string(),
            ],
        },
        phase_2: RoadmapPhase {
            title: "Standardization (Level 2 to Level 3)".to_string(),
            duration: "6-9 months".to_string(),
            clauses: [clause_ids(critical), clause_ids(moderate)].concat(),
            key_actions: vec![
                "Develop standardized frameworks".to_string(),
                "Integrate processes into strategic planning".to_string(),
                "Establish regular review processes".to_string(),
            ],
        },
        phase_3: RoadmapPhase {
            title: "Optimization (Level 3 to Level 4)".to_string(),
            duration: "6-12 months".to_string(),
            clauses: [clause_ids(critical), clause_ids(moderate), clause_ids(minor)].concat(),
            key_actions: vec![
                "Implement automation and monitoring systems".to_string(),
                "Use data-driven decision making".to_string(),
                "Align all processes with strategic objectives".to_string(),
            ],
        },
    }
}

fn build_priority_matrix(
    critical: &[GapInfo],
    moderate: &[GapInfo],
    minor: &[GapInfo],
) -> PriorityMatrix {
    let labels = |gaps: &[GapInfo]| {
        gaps.iter()
            .take(5)
            .map(|g| format!("{} - {}", g.clause, g.clause_name))
            .collect::<Vec<_>>()
    };

    PriorityMatrix {
        quick_wins: labels(minor),
        strategic_initiatives: labels(critical),
        foundational_requirements: labels(moderate),
    }
}

fn build_executive_summary(
    overall_maturity: &str,
    overall_percentage_score: f64,
    clause_count: usize,
    critical: &[GapInfo],
    moderate: &[GapInfo],
    minor: &[GapInfo],
) -> String {
    let mut summary = format!(
        "Based on your assessment selections, the organization is currently at {overall_maturity} maturity level \
         with an overall compliance score of {overall_percentage_score:.1}%. \
         Out of {clause_count} clauses assessed, {} require critical attention, \
         {} have moderate gaps, and {} have minor gaps.",
        critical.len(),
        moderate.len(),
        minor.len(),
    );

    if !critical.is_empty() {
        let focus = critical
            .iter()
            .take(3)
            .map(|g| format!("{} - {}", g.clause, g.clause_name))
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!(" Priority focus areas include {focus}."));
    }

    summary
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{CalculatedScore, MaturityLevel, Practice};

    fn make_levels() -> Vec<MaturityLevel> {
        (1..=4)
            .map(|level| MaturityLevel {
                level,
                description: format!("Level {level} capability description"),
                practices: (1..=6)
                    .map(|i| Practice {
                        text: format!("L{level} practice {i}"),
                        score: 0.5,
                    })
                    .collect(),
            })
            .collect()
    }

    fn make_assessment(
        clause: &str,
        selected: Option<u8>,
        score: Option<(f64, f64, f64)>,
    ) -> ClauseAssessment {
        ClauseAssessment {
            clause: clause.to_string(),
            requirements: vec![],
            critical_question: String::new(),
            completeness_statement: String::new(),
            maturity_levels: make_levels(),
            selected_maturity_level: selected,
            calculated_score: score.map(|(total, max, percentage)| CalculatedScore {
                total,
                max,
                percentage,
            }),
        }
    }

    #[test]
    fn test_unselected_clause_defaults_to_level_one_critical() {
        let report = generate_compliance_report(&[make_assessment("4.1 Context", None, None)]);
        let gap = &report.assessed_clauses[0];
        assert_eq!(gap.current_level, 1.0);
        assert_eq!(gap.selected_level, 1);
        assert_eq!(gap.priority, "Critical");
        assert_eq!(gap.impact, "High");
        assert_eq!(report.gap_analysis.critical_gaps.len(), 1);
    }

    #[test]
    fn test_level_three_with_strong_evidence_is_minor() {
        let report = generate_compliance_report(&[make_assessment(
            "7.3 Design and Development",
            Some(3),
            Some((8.0, 10.0, 80.0)),
        )]);
        let gap = &report.assessed_clauses[0];
        assert_eq!(gap.current_level, 3.0);
        assert_eq!(report.gap_analysis.minor_gaps.len(), 1);
        assert_eq!(gap.priority, "Medium"); // gap 1.0
        assert_eq!(gap.impact, "Low");
    }

    #[test]
    fn test_weak_evidence_dampens_half_a_level() {
        let report = generate_compliance_report(&[make_assessment(
            "8.1 Operational Planning",
            Some(2),
            Some((3.0, 10.0, 30.0)),
        )]);
        let gap = &report.assessed_clauses[0];
        assert_eq!(gap.current_level, 1.5);
        // gap = 2.5 lands exactly on the critical threshold
        assert_eq!(report.gap_analysis.critical_gaps.len(), 1);
        assert_eq!(gap.priority, "Critical");
    }

    #[test]
    fn test_partial_evidence_dampens_a_quarter_level() {
        let report = generate_compliance_report(&[make_assessment(
            "9.1 Monitoring",
            Some(3),
            Some((6.0, 10.0, 60.0)),
        )]);
        let gap = &report.assessed_clauses[0];
        // Serialized level is rounded to one decimal; bucketing used 2.75
        assert_eq!(gap.current_level, 2.8);
        assert_eq!(report.gap_analysis.minor_gaps.len(), 1); // gap 1.25
    }

    #[test]
    fn test_dampening_never_drops_below_level_one() {
        let report = generate_compliance_report(&[make_assessment(
            "4.2 Interested Parties",
            Some(1),
            Some((0.0, 10.0, 0.0)),
        )]);
        // Level 1 is never dampened
        assert_eq!(report.assessed_clauses[0].current_level, 1.0);
    }

    #[test]
    fn test_empty_input_returns_default_report() {
        let report = generate_compliance_report(&[]);
        assert_eq!(report.overall_maturity_score, "Level 1.0");
        assert_eq!(report.overall_maturity_numeric, 1.0);
        assert_eq!(report.overall_percentage_score, 0.0);
        assert_eq!(report.total_clauses, 0);
        assert!(report.assessed_clauses.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.gap_analysis.critical_gaps.is_empty());
    }

    #[test]
    fn test_buckets_partition_assessed_clauses_exactly() {
        let records = vec![
            make_assessment("4.1 Context", None, None),
            make_assessment("5.1 Leadership", Some(2), Some((8.0, 10.0, 80.0))),
            make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))),
            make_assessment("7.1 Resources", Some(4), Some((10.0, 10.0, 100.0))),
            make_assessment("8.1 Operations", Some(2), Some((3.0, 10.0, 30.0))),
        ];
        let report = generate_compliance_report(&records);
        let bucketed = report.gap_analysis.critical_gaps.len()
            + report.gap_analysis.moderate_gaps.len()
            + report.gap_analysis.minor_gaps.len();
        assert_eq!(bucketed, records.len());
        assert_eq!(report.assessed_clauses.len(), records.len());
        assert_eq!(report.total_clauses, records.len());
    }

    #[test]
    fn test_overall_percentage_is_weighted_not_averaged() {
        let records = vec![
            make_assessment("4.1 Context", Some(2), Some((8.0, 10.0, 80.0))),
            make_assessment("5.1 Leadership", Some(2), Some((0.0, 10.0, 0.0))),
        ];
        let report = generate_compliance_report(&records);
        // Weighted: 8/20 = 40%. Effective levels: 2.0 and 1.5 → avg 1.75.
        // Combined: (1.75/4*100)*0.6 + 40*0.4 = 26.25 + 16 = 42.25 → 42.3
        assert_eq!(report.overall_percentage_score, 42.3);
        assert_eq!(report.overall_maturity_score, "Level 1.8");
    }

    #[test]
    fn test_fully_compliant_clause_scores_one_hundred() {
        let report = generate_compliance_report(&[make_assessment(
            "4.1 Context",
            Some(4),
            Some((10.0, 10.0, 100.0)),
        )]);
        assert_eq!(report.overall_percentage_score, 100.0);
        assert_eq!(report.overall_maturity_score, "Level 4.0");
        assert_eq!(report.gap_analysis.minor_gaps[0].priority, "Low");
    }

    #[test]
    fn test_percentage_score_stays_in_bounds() {
        let records = vec![
            make_assessment("4.1 Context", None, None),
            make_assessment("5.1 Leadership", Some(4), Some((10.0, 10.0, 100.0))),
            make_assessment("6.1 Risks", Some(1), Some((0.0, 10.0, 0.0))),
        ];
        let report = generate_compliance_report(&records);
        assert!(report.overall_percentage_score >= 0.0);
        assert!(report.overall_percentage_score <= 100.0);
    }

    #[test]
    fn test_roadmap_steps_from_effective_one_and_a_half() {
        let report = generate_compliance_report(&[make_assessment(
            "8.1 Operations",
            Some(2),
            Some((3.0, 10.0, 30.0)),
        )]);
        let steps = &report.assessed_clauses[0].gap_details.roadmap_to_level_4;
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps.iter().map(|s| s.target_level).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(steps[2].title, "Step 3: Reach Level 4 (Target)");
    }

    #[test]
    fn test_roadmap_skips_targets_already_met() {
        let report = generate_compliance_report(&[make_assessment(
            "6.1 Risks",
            Some(3),
            Some((8.0, 10.0, 80.0)),
        )]);
        let steps = &report.assessed_clauses[0].gap_details.roadmap_to_level_4;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].target_level, 4);
        assert_eq!(steps[0].step, 1);
        assert_eq!(steps[0].title, "Step 1: Reach Level 4 (Target)");
    }

    #[test]
    fn test_roadmap_omits_step_without_level_data_and_renumbers() {
        let mut assessment = make_assessment("4.1 Context", None, None);
        assessment.maturity_levels.retain(|ml| ml.level != 3);
        let report = generate_compliance_report(&[assessment]);
        let steps = &report.assessed_clauses[0].gap_details.roadmap_to_level_4;
        assert_eq!(
            steps.iter().map(|s| s.target_level).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_roadmap_step_carries_first_four_practices() {
        let report = generate_compliance_report(&[make_assessment("4.1 Context", None, None)]);
        let steps = &report.assessed_clauses[0].gap_details.roadmap_to_level_4;
        assert_eq!(steps[0].practices.len(), 4);
        assert_eq!(steps[0].practices[0], "L2 practice 1");
        assert!(steps[0]
            .what_to_do
            .ends_with("L2 practice 1, L2 practice 2, L2 practice 3"));
    }

    #[test]
    fn test_recommendations_ordered_critical_first() {
        let records = vec![
            make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))), // minor
            make_assessment("4.1 Context", None, None),                     // critical
            make_assessment("5.1 Leadership", Some(2), Some((8.0, 10.0, 80.0))), // moderate
        ];
        let report = generate_compliance_report(&records);
        let clauses: Vec<&str> = report.recommendations.iter().map(|r| r.clause.as_str()).collect();
        assert_eq!(clauses, vec!["4.1", "5.1", "6.1"]);
    }

    #[test]
    fn test_recommendation_timelines_follow_gap_size() {
        let records = vec![
            make_assessment("4.1 Context", None, None), // gap 3.0
            make_assessment("5.1 Leadership", Some(2), Some((8.0, 10.0, 80.0))), // gap 2.0
            make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))), // gap 1.0
        ];
        let report = generate_compliance_report(&records);
        assert_eq!(report.recommendations[0].timeline, "6-12 months");
        assert_eq!(report.recommendations[1].timeline, "3-6 months");
        assert_eq!(report.recommendations[2].timeline, "1-3 months");
    }

    #[test]
    fn test_recommendation_action_items_gate_on_selected_level() {
        let report = generate_compliance_report(&[make_assessment("4.1 Context", None, None)]);
        let items = &report.recommendations[0].action_items;
        assert_eq!(items.len(), 3);
        assert!(items[0].starts_with("Immediate:"));
        assert!(items[1].starts_with("Short-term:"));
        assert!(items[2].starts_with("Long-term:"));

        let report = generate_compliance_report(&[make_assessment(
            "7.1 Resources",
            Some(3),
            Some((8.0, 10.0, 80.0)),
        )]);
        let items = &report.recommendations[0].action_items;
        assert_eq!(items.len(), 1);
        assert!(items[0].starts_with("Long-term:"));
    }

    #[test]
    fn test_fully_mature_clause_gets_no_action_items() {
        let report = generate_compliance_report(&[make_assessment(
            "7.1 Resources",
            Some(4),
            Some((10.0, 10.0, 100.0)),
        )]);
        assert!(report.recommendations[0].action_items.is_empty());
        assert_eq!(report.recommendations[0].timeline, "1-3 months");
    }

    #[test]
    fn test_priority_matrix_uses_clause_dash_name_labels() {
        let records = vec![
            make_assessment("4.1 Context", None, None),
            make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))),
        ];
        let report = generate_compliance_report(&records);
        assert_eq!(report.priority_matrix.strategic_initiatives, vec!["4.1 - Context"]);
        assert_eq!(report.priority_matrix.quick_wins, vec!["6.1 - Risks"]);
        assert!(report.priority_matrix.foundational_requirements.is_empty());
    }

    #[test]
    fn test_roadmap_phases_widen_scope() {
        let critical: Vec<ClauseAssessment> = (1..=7)
            .map(|i| make_assessment(&format!("4.{i} Clause {i}"), None, None))
            .collect();
        let mut records = critical;
        records.push(make_assessment("5.1 Leadership", Some(2), Some((8.0, 10.0, 80.0))));
        records.push(make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))));

        let report = generate_compliance_report(&records);
        let roadmap = &report.roadmap_to_level_4;
        // First 5 critical + first 3 moderate (only 1 exists)
        assert_eq!(roadmap.phase_1.clauses.len(), 6);
        // All critical + moderate
        assert_eq!(roadmap.phase_2.clauses.len(), 8);
        // Everything with a gap
        assert_eq!(roadmap.phase_3.clauses.len(), 9);
        assert_eq!(roadmap.phase_1.title, "Foundation (Level 1 to Level 2)");
        assert_eq!(roadmap.phase_1.key_actions.len(), 3);
    }

    #[test]
    fn test_executive_summary_reports_counts_and_focus_areas() {
        let records = vec![
            make_assessment("4.1 Context", None, None),
            make_assessment("6.1 Risks", Some(3), Some((8.0, 10.0, 80.0))),
        ];
        let report = generate_compliance_report(&records);
        assert!(report.executive_summary.contains(&report.overall_maturity_score));
        assert!(report.executive_summary.contains("1 require critical attention"));
        assert!(report.executive_summary.contains("1 have minor gaps"));
        assert!(report.executive_summary.contains("4.1 - Context"));
    }

    #[test]
    fn test_executive_summary_omits_focus_areas_without_critical_gaps() {
        let report = generate_compliance_report(&[make_assessment(
            "6.1 Risks",
            Some(3),
            Some((8.0, 10.0, 80.0)),
        )]);
        assert!(!report.executive_summary.contains("Priority focus areas"));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let records = vec![
            make_assessment("4.1 Context", None, None),
            make_assessment("5.1 Leadership", Some(2), Some((3.0, 10.0, 30.0))),
        ];
        let first = serde_json::to_string(&generate_compliance_report(&records)).unwrap();
        let second = serde_json::to_string(&generate_compliance_report(&records)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_notes_for_unselected_clause() {
        let report = generate_compliance_report(&[make_assessment("4.1 Context", None, None)]);
        let notes = &report.assessed_clauses[0].gap_details.user_selection;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].level, Some(1));
        assert!(notes[0].content.contains("No maturity level has been selected"));
        assert_eq!(notes[1].percentage, Some(0.0));
    }

    #[test]
    fn test_gap_description_mentions_completion_percentage() {
        let report = generate_compliance_report(&[make_assessment(
            "5.1 Leadership",
            Some(2),
            Some((3.0, 10.0, 30.0)),
        )]);
        let desc = &report.assessed_clauses[0].gap_description;
        assert!(desc.contains("You selected Level 2."));
        assert!(desc.contains("Practice completion: 30.0%."));
    }
}
