use crate::dashboard::analytics::whole_percent;
use crate::model::{Dashboard, StudentOverview, StudentId, percent_label};

/// A short observation shown in the insights grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub icon: &'static str,
    pub title: &'static str,
    pub content: String,
}

fn mentions_any(student: &StudentOverview, needles: &[&str]) -> bool {
    student.top_concerns.iter().any(|concern| {
        let concern = concern.to_lowercase();
        needles.iter().any(|needle| concern.contains(needle))
    })
}

/// Derives the class-level insight cards, in display order.
#[must_use]
pub fn generate_insights(dashboard: &Dashboard) -> Vec<Insight> {
    let mut insights = Vec::new();
    let summary = &dashboard.summary;

    if summary.total_students > 0 {
        let rate = whole_percent(
            summary.at_risk_students as usize,
            summary.total_students as usize,
        );
        let exact = f64::from(summary.at_risk_students) / f64::from(summary.total_students) * 100.0;
        insights.push(if exact > 30.0 {
            Insight {
                icon: "⚠️",
                title: "High Risk Alert",
                content: format!(
                    "{rate}% of students are at risk. Consider class-wide intervention strategies."
                ),
            }
        } else if exact > 15.0 {
            Insight {
                icon: "📊",
                title: "Moderate Risk Levels",
                content: format!("{rate}% of students need attention. Focus on targeted support."),
            }
        } else {
            Insight {
                icon: "✅",
                title: "Good Overall Performance",
                content: format!(
                    "Only {rate}% of students at risk. Class is performing well overall."
                ),
            }
        });
    }

    let hardest = dashboard
        .concept_analysis
        .iter()
        .fold(None::<(&str, f64)>, |best, (name, stats)| match best {
            Some((_, score)) if stats.avg_gap_score <= score => best,
            _ => Some((name.as_str(), stats.avg_gap_score)),
        });
    if let Some((name, score)) = hardest.filter(|(_, score)| *score > 0.4) {
        insights.push(Insight {
            icon: "🧩",
            title: "Challenging Concept Identified",
            content: format!(
                "\"{name}\" shows the highest learning gaps ({} avg). Consider additional teaching time.",
                percent_label(score)
            ),
        });
    }

    let ai_flagged = dashboard
        .students
        .iter()
        .filter(|s| mentions_any(s, &["ai", "assistance"]))
        .count();
    if ai_flagged > 0 {
        insights.push(Insight {
            icon: "🤖",
            title: "Potential AI Usage Detected",
            content: format!(
                "{ai_flagged} student(s) show patterns suggesting possible AI assistance. Review individual analyses."
            ),
        });
    }

    let speed_flagged = dashboard
        .students
        .iter()
        .filter(|s| mentions_any(s, &["fast", "speed"]))
        .count();
    if speed_flagged > 2 {
        insights.push(Insight {
            icon: "⏱️",
            title: "Response Speed Concerns",
            content: "Multiple students showing unusual response speed patterns. Consider implementing time-based learning strategies.".to_string(),
        });
    }

    insights
}

//
// ─── ALERTS / INTERVENTIONS ────────────────────────────────────────────────────
//

/// A student needing immediate attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub student_id: StudentId,
    pub gap_label: String,
    pub concerns: String,
}

#[must_use]
pub fn alerts(students: &[StudentOverview]) -> Vec<Alert> {
    students
        .iter()
        .filter(|s| s.overall_risk.is_urgent())
        .map(|s| Alert {
            student_id: s.student_id.clone(),
            gap_label: percent_label(s.overall_score),
            concerns: s.top_concerns.join(", "),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterventionKind {
    AiDependency,
    ConfidenceCalibration,
    GeneralSupport,
}

impl InterventionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AiDependency => "AI Dependency Detected",
            Self::ConfidenceCalibration => "Confidence Calibration Needed",
            Self::GeneralSupport => "General Support",
        }
    }

    /// Suggested follow-up actions, primary first.
    #[must_use]
    pub fn actions(self) -> [&'static str; 2] {
        match self {
            Self::AiDependency => ["📞 Schedule 1-on-1", "📝 Assign Practice"],
            Self::ConfidenceCalibration => ["🎯 Confidence Training", "👥 Peer Support"],
            Self::GeneralSupport => ["👀 View Details", "📋 Create Action Plan"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intervention {
    Urgent {
        student_id: StudentId,
        kind: InterventionKind,
    },
    /// Shown when students exist but none is urgent.
    General,
}

#[must_use]
pub fn interventions(students: &[StudentOverview]) -> Vec<Intervention> {
    let urgent: Vec<Intervention> = students
        .iter()
        .filter(|s| s.overall_risk.is_urgent())
        .map(|s| {
            let kind = if mentions_any(s, &["ai"]) {
                InterventionKind::AiDependency
            } else if mentions_any(s, &["confidence"]) {
                InterventionKind::ConfidenceCalibration
            } else {
                InterventionKind::GeneralSupport
            };
            Intervention::Urgent {
                student_id: s.student_id.clone(),
                kind,
            }
        })
        .collect();

    if urgent.is_empty() && !students.is_empty() {
        vec![Intervention::General]
    } else {
        urgent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConceptStats, DashboardSummary, RiskLevel};

    fn student(id: &str, risk: RiskLevel, concerns: &[&str]) -> StudentOverview {
        StudentOverview {
            student_id: StudentId::new(id).unwrap(),
            overall_risk: risk,
            overall_score: 0.5,
            timestamp: None,
            top_concerns: concerns.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    fn dashboard(total: u32, at_risk: u32, students: Vec<StudentOverview>) -> Dashboard {
        Dashboard {
            summary: DashboardSummary {
                total_students: total,
                at_risk_students: at_risk,
                ..DashboardSummary::default()
            },
            students,
            ..Dashboard::default()
        }
    }

    #[test]
    fn no_students_no_risk_insight() {
        assert!(generate_insights(&Dashboard::default()).is_empty());
    }

    #[test]
    fn risk_rate_buckets() {
        assert_eq!(generate_insights(&dashboard(10, 4, vec![]))[0].title, "High Risk Alert");
        assert_eq!(generate_insights(&dashboard(10, 2, vec![]))[0].title, "Moderate Risk Levels");
        let good = &generate_insights(&dashboard(10, 1, vec![]))[0];
        assert_eq!(good.title, "Good Overall Performance");
        assert!(good.content.starts_with("Only 10%"));
    }

    #[test]
    fn concept_and_concern_insights() {
        let mut data = dashboard(
            4,
            0,
            vec![
                student("a", RiskLevel::Safe, &["AI assistance likely"]),
                student("b", RiskLevel::Safe, &["fast answers"]),
                student("c", RiskLevel::Safe, &["Speed anomaly"]),
                student("d", RiskLevel::Safe, &["too fast"]),
            ],
        );
        data.concept_analysis.insert(
            "Fractions".into(),
            ConceptStats {
                total_students: 4,
                avg_gap_score: 0.55,
                at_risk_count: 1,
            },
        );
        data.concept_analysis.insert(
            "Decimals".into(),
            ConceptStats {
                total_students: 4,
                avg_gap_score: 0.2,
                at_risk_count: 0,
            },
        );
        let titles: Vec<_> = generate_insights(&data).iter().map(|i| i.title).collect();
        assert_eq!(
            titles,
            vec![
                "Good Overall Performance",
                "Challenging Concept Identified",
                "Potential AI Usage Detected",
                "Response Speed Concerns",
            ]
        );
        assert!(generate_insights(&data)[1].content.contains("\"Fractions\""));
    }

    #[test]
    fn urgent_students_get_typed_interventions() {
        let students = vec![
            student("a", RiskLevel::AtRisk, &["AI assistance"]),
            student("b", RiskLevel::High, &["Confidence mismatch"]),
            student("c", RiskLevel::Critical, &["Gaps in basics"]),
            student("d", RiskLevel::Watch, &["AI"]),
        ];
        let kinds: Vec<_> = interventions(&students)
            .into_iter()
            .map(|i| match i {
                Intervention::Urgent { kind, .. } => Some(kind),
                Intervention::General => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(InterventionKind::AiDependency),
                Some(InterventionKind::ConfidenceCalibration),
                Some(InterventionKind::GeneralSupport),
            ]
        );
        assert_eq!(alerts(&students).len(), 3);
    }

    #[test]
    fn calm_class_gets_general_card() {
        let students = vec![student("a", RiskLevel::Safe, &[])];
        assert_eq!(interventions(&students), vec![Intervention::General]);
        assert!(interventions(&[]).is_empty());
        assert!(alerts(&students).is_empty());
    }
}
