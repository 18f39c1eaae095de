use chrono::{DateTime, Utc};

use crate::model::{Analysis, ConceptStats, StudentOverview, percent_label};

//
// ─── AI LIKELIHOOD ─────────────────────────────────────────────────────────────
//

pub const AI_LIKELIHOOD_MIN: u8 = 5;
pub const AI_LIKELIHOOD_MAX: u8 = 95;

/// Keyword heuristic over the backend's free-text concerns, in percent.
///
/// This is a placeholder until the backend reports a real signal. It is
/// deterministic: the same concerns always give the same score.
#[must_use]
pub fn ai_likelihood(concerns: &[String]) -> u8 {
    let mentions = |needle: &str| {
        concerns
            .iter()
            .any(|concern| concern.to_lowercase().contains(needle))
    };
    let mut score: u32 = 0;
    if mentions("ai") {
        score += 60;
    }
    if mentions("fast") {
        score += 30;
    }
    if mentions("confidence") {
        score += 20;
    }
    let clamped = score.clamp(u32::from(AI_LIKELIHOOD_MIN), u32::from(AI_LIKELIHOOD_MAX));
    u8::try_from(clamped).unwrap_or(AI_LIKELIHOOD_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiBucket {
    High,
    Medium,
    Low,
}

impl AiBucket {
    #[must_use]
    pub fn from_likelihood(likelihood: u8) -> Self {
        if likelihood > 60 {
            Self::High
        } else if likelihood > 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Meter colour class; the meter turns red above 70 and amber above 40.
    #[must_use]
    pub fn meter_class(likelihood: u8) -> &'static str {
        if likelihood > 70 {
            "meter-high"
        } else if likelihood > 40 {
            "meter-medium"
        } else {
            "meter-low"
        }
    }
}

//
// ─── PREDICTION / TREND ────────────────────────────────────────────────────────
//

/// Gap-score bucket shown as a performance prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prediction {
    Improving,
    Stable,
    AtRisk,
}

impl Prediction {
    #[must_use]
    pub fn from_gap(gap_score: f64) -> Self {
        if gap_score < 0.3 {
            Self::Improving
        } else if gap_score < 0.6 {
            Self::Stable
        } else {
            Self::AtRisk
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Stable => "Stable",
            Self::AtRisk => "At Risk",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Improving => "📈",
            Self::Stable => "📊",
            Self::AtRisk => "📉",
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Improving => "prediction-improving",
            Self::Stable => "prediction-stable",
            Self::AtRisk => "prediction-declining",
        }
    }
}

/// Class-wide counts per prediction bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrendCounts {
    pub improving: usize,
    pub stagnant: usize,
    pub declining: usize,
}

impl TrendCounts {
    #[must_use]
    pub fn from_students(students: &[StudentOverview]) -> Self {
        students
            .iter()
            .fold(Self::default(), |mut counts, student| {
                match Prediction::from_gap(student.overall_score) {
                    Prediction::Improving => counts.improving += 1,
                    Prediction::Stable => counts.stagnant += 1,
                    Prediction::AtRisk => counts.declining += 1,
                }
                counts
            })
    }
}

/// Share of students flagged anything other than safe, as a whole percent.
#[must_use]
pub fn detection_rate(students: &[StudentOverview]) -> Option<u32> {
    if students.is_empty() {
        return None;
    }
    let flagged = students.iter().filter(|s| !s.overall_risk.is_safe()).count();
    Some(whole_percent(flagged, students.len()))
}

/// Direction of the latest score relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTrend {
    Improving,
    Declining,
    Stable,
}

impl HistoryTrend {
    /// `None` with fewer than two assessments.
    #[must_use]
    pub fn from_history(history: &[Analysis]) -> Option<Self> {
        let [.., previous, latest] = history else {
            return None;
        };
        let (previous, latest) = (previous.overall_score, latest.overall_score);
        Some(if latest > previous + 0.1 {
            Self::Improving
        } else if latest < previous - 0.1 {
            Self::Declining
        } else {
            Self::Stable
        })
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving 📈",
            Self::Declining => "Declining 📉",
            Self::Stable => "Stable ➡️",
        }
    }
}

/// Sentence shown under "Assessment History" in the student detail.
#[must_use]
pub fn history_summary(history: &[Analysis]) -> String {
    match HistoryTrend::from_history(history) {
        Some(trend) => format!(
            "Student has taken {} assessments. Performance trend: {}",
            history.len(),
            trend.label()
        ),
        None => "First assessment completed.".to_string(),
    }
}

//
// ─── CONCEPTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptRisk {
    High,
    Medium,
    Low,
}

impl ConceptRisk {
    #[must_use]
    pub fn classify(stats: &ConceptStats) -> Self {
        let rate = stats.at_risk_rate();
        if rate > 0.3 || stats.avg_gap_score > 0.6 {
            Self::High
        } else if rate > 0.1 || stats.avg_gap_score > 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::High => "high-risk",
            Self::Medium => "medium-risk",
            Self::Low => "low-risk",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptCard {
    pub name: String,
    pub risk: ConceptRisk,
    pub total_students: u32,
    pub at_risk_count: u32,
    pub avg_gap_label: String,
    pub risk_rate_label: String,
}

impl ConceptCard {
    #[must_use]
    pub fn new(name: &str, stats: &ConceptStats) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rate = (stats.at_risk_rate() * 100.0).round() as u32;
        Self {
            name: name.to_string(),
            risk: ConceptRisk::classify(stats),
            total_students: stats.total_students,
            at_risk_count: stats.at_risk_count,
            avg_gap_label: percent_label(stats.avg_gap_score),
            risk_rate_label: format!("{rate}%"),
        }
    }
}

/// One tile of the mastery heat map, coloured by average gap alone.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub short_name: String,
    pub title: String,
    pub risk: ConceptRisk,
}

impl HeatCell {
    #[must_use]
    pub fn new(name: &str, stats: &ConceptStats) -> Self {
        let gap = stats.avg_gap_score;
        let risk = if gap < 0.3 {
            ConceptRisk::Low
        } else if gap < 0.6 {
            ConceptRisk::Medium
        } else {
            ConceptRisk::High
        };
        #[allow(clippy::cast_possible_truncation)]
        let whole = (gap * 100.0).round() as i64;
        Self {
            short_name: name.split_whitespace().next().unwrap_or(name).to_string(),
            title: format!("{name}: {whole}% gap"),
            risk,
        }
    }
}

//
// ─── ROWS ──────────────────────────────────────────────────────────────────────
//

/// Everything the student table shows for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub student: StudentOverview,
    pub gap_label: String,
    pub ai_likelihood: u8,
    pub ai_bucket: AiBucket,
    pub prediction: Prediction,
    pub last_assessment: String,
    pub concerns_label: String,
}

impl StudentRow {
    #[must_use]
    pub fn new(student: &StudentOverview) -> Self {
        let ai_likelihood = ai_likelihood(&student.top_concerns);
        Self {
            gap_label: percent_label(student.overall_score),
            ai_likelihood,
            ai_bucket: AiBucket::from_likelihood(ai_likelihood),
            prediction: Prediction::from_gap(student.overall_score),
            last_assessment: date_label(student.timestamp),
            concerns_label: concerns_label(&student.top_concerns, 2),
            student: student.clone(),
        }
    }

    /// High-likelihood rows get a review flag instead of an action plan.
    #[must_use]
    pub fn should_flag(&self) -> bool {
        self.ai_bucket == AiBucket::High
    }
}

/// First `limit` concerns joined with commas, or a "No major concerns" note.
#[must_use]
pub fn concerns_label(concerns: &[String], limit: usize) -> String {
    if concerns.is_empty() {
        return "No major concerns".to_string();
    }
    concerns
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[must_use]
pub fn date_label(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "Unknown".to_string(), |at| at.format("%Y-%m-%d").to_string())
}

#[must_use]
pub fn datetime_label(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "Unknown".to_string(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub(crate) fn whole_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let pct = ((part as f64 / total as f64) * 100.0).round() as u32;
    pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, StudentId};
    use crate::time::fixed_now;

    fn concerns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn student(id: &str, risk: &str, score: f64, items: &[&str]) -> StudentOverview {
        StudentOverview {
            student_id: StudentId::new(id).unwrap(),
            overall_risk: RiskLevel::parse(risk),
            overall_score: score,
            timestamp: Some(fixed_now()),
            top_concerns: concerns(items),
        }
    }

    #[test]
    fn ai_likelihood_is_deterministic_and_clamped() {
        assert_eq!(ai_likelihood(&[]), 5);
        let heavy = concerns(&[
            "Possible AI assistance",
            "Very fast answers",
            "Confidence mismatch",
        ]);
        assert_eq!(ai_likelihood(&heavy), 95);
        assert_eq!(ai_likelihood(&heavy), ai_likelihood(&heavy));
        assert_eq!(ai_likelihood(&concerns(&["Answered too FAST"])), 30);
    }

    #[test]
    fn ai_buckets() {
        assert_eq!(AiBucket::from_likelihood(61), AiBucket::High);
        assert_eq!(AiBucket::from_likelihood(60), AiBucket::Medium);
        assert_eq!(AiBucket::from_likelihood(30), AiBucket::Low);
    }

    #[test]
    fn predictions_and_trend_counts() {
        let students = vec![
            student("a", "safe", 0.1, &[]),
            student("b", "watch", 0.45, &[]),
            student("c", "at_risk", 0.8, &[]),
            student("d", "at_risk", 0.6, &[]),
        ];
        let counts = TrendCounts::from_students(&students);
        assert_eq!(
            counts,
            TrendCounts {
                improving: 1,
                stagnant: 1,
                declining: 2
            }
        );
        assert_eq!(detection_rate(&students), Some(75));
        assert_eq!(detection_rate(&[]), None);
    }

    #[test]
    fn history_trend_uses_last_two_scores() {
        let scored = |s: f64| Analysis {
            overall_score: s,
            ..Analysis::default()
        };
        assert_eq!(HistoryTrend::from_history(&[scored(0.2)]), None);
        assert_eq!(
            HistoryTrend::from_history(&[scored(0.9), scored(0.2), scored(0.5)]),
            Some(HistoryTrend::Improving)
        );
        assert_eq!(
            HistoryTrend::from_history(&[scored(0.5), scored(0.3)]),
            Some(HistoryTrend::Declining)
        );
        assert_eq!(history_summary(&[scored(0.5)]), "First assessment completed.");
        assert!(history_summary(&[scored(0.5), scored(0.55)]).ends_with("Stable ➡️"));
    }

    #[test]
    fn concept_cards_classify() {
        let stats = |total, gap, at_risk| ConceptStats {
            total_students: total,
            avg_gap_score: gap,
            at_risk_count: at_risk,
        };
        assert_eq!(ConceptRisk::classify(&stats(10, 0.2, 4)), ConceptRisk::High);
        assert_eq!(ConceptRisk::classify(&stats(10, 0.65, 0)), ConceptRisk::High);
        assert_eq!(ConceptRisk::classify(&stats(10, 0.2, 2)), ConceptRisk::Medium);
        assert_eq!(ConceptRisk::classify(&stats(10, 0.1, 0)), ConceptRisk::Low);

        let empty = ConceptCard::new("Fractions", &stats(0, 0.0, 0));
        assert_eq!(empty.risk_rate_label, "0%");
        assert_eq!(empty.risk, ConceptRisk::Low);

        let cell = HeatCell::new("Linear Equations", &stats(3, 0.5, 1));
        assert_eq!(cell.short_name, "Linear");
        assert_eq!(cell.title, "Linear Equations: 50% gap");
        assert_eq!(cell.risk, ConceptRisk::Medium);
    }

    #[test]
    fn student_row_labels() {
        let row = StudentRow::new(&student(
            "s1",
            "at_risk",
            0.723,
            &["AI assistance suspected", "fast responses", "third"],
        ));
        assert_eq!(row.gap_label, "72.3%");
        assert_eq!(row.ai_likelihood, 90);
        assert!(row.should_flag());
        assert_eq!(row.concerns_label, "AI assistance suspected, fast responses");
        assert_eq!(row.last_assessment, "2023-11-14");
        assert_eq!(row.prediction, Prediction::AtRisk);

        assert_eq!(concerns_label(&[], 2), "No major concerns");
        assert_eq!(date_label(None), "Unknown");
    }
}
