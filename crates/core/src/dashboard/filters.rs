use crate::dashboard::analytics::{AiBucket, StudentRow};
use crate::model::RiskLevel;

/// Student table filter on the overall risk level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RiskFilter {
    #[default]
    All,
    Level(RiskLevel),
}

impl RiskFilter {
    /// `"all"` (or blank) disables the filter; anything else is a risk wire value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Level(RiskLevel::parse(raw))
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Level(level) => level.as_wire(),
        }
    }

    #[must_use]
    pub fn matches(&self, level: &RiskLevel) -> bool {
        match self {
            Self::All => true,
            Self::Level(wanted) => wanted == level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiFilter {
    #[default]
    All,
    Only(AiBucket),
}

impl AiFilter {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::Only(AiBucket::High),
            "medium" => Self::Only(AiBucket::Medium),
            "low" => Self::Only(AiBucket::Low),
            _ => Self::All,
        }
    }

    #[must_use]
    pub fn as_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(bucket) => bucket.as_str(),
        }
    }

    #[must_use]
    pub fn matches(self, bucket: AiBucket) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == bucket,
        }
    }
}

/// Both table filters; a row is shown only when it passes each.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentFilter {
    pub risk: RiskFilter,
    pub ai: AiFilter,
}

impl StudentFilter {
    #[must_use]
    pub fn matches(&self, row: &StudentRow) -> bool {
        self.risk.matches(&row.student.overall_risk) && self.ai.matches(row.ai_bucket)
    }

    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [StudentRow]) -> Vec<&'a StudentRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StudentId, StudentOverview};

    fn row(id: &str, risk: &str, concerns: &[&str]) -> StudentRow {
        StudentRow::new(&StudentOverview {
            student_id: StudentId::new(id).unwrap(),
            overall_risk: RiskLevel::parse(risk),
            overall_score: 0.4,
            timestamp: None,
            top_concerns: concerns.iter().map(|c| (*c).to_string()).collect(),
        })
    }

    #[test]
    fn parse_filters() {
        assert_eq!(RiskFilter::parse("all"), RiskFilter::All);
        assert_eq!(RiskFilter::parse("at_risk"), RiskFilter::Level(RiskLevel::AtRisk));
        assert_eq!(RiskFilter::parse("at_risk").as_value(), "at_risk");
        assert_eq!(AiFilter::parse("HIGH"), AiFilter::Only(AiBucket::High));
        assert_eq!(AiFilter::parse("whatever"), AiFilter::All);
    }

    #[test]
    fn filters_combine() {
        let rows = vec![
            row("a", "at_risk", &["AI assistance"]),
            row("b", "at_risk", &[]),
            row("c", "safe", &["ai flagged", "fast"]),
        ];
        let filter = StudentFilter {
            risk: RiskFilter::parse("at_risk"),
            ai: AiFilter::parse("low"),
        };
        let shown: Vec<_> = filter
            .apply(&rows)
            .iter()
            .map(|r| r.student.student_id.as_str())
            .collect();
        assert_eq!(shown, vec!["b"]);
        assert_eq!(StudentFilter::default().apply(&rows).len(), 3);
    }
}
