use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical risk bucket reported by the analysis backend.
///
/// Two vocabularies are in circulation (`safe|watch|at_risk` and
/// `low|medium|high|critical`); both are accepted. Unknown strings are kept
/// verbatim so they still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Safe,
    Watch,
    AtRisk,
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl RiskLevel {
    /// Parses a wire value (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "safe" => Self::Safe,
            "watch" => Self::Watch,
            "at_risk" | "at risk" | "at-risk" => Self::AtRisk,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// The wire spelling of this level.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Safe => "safe",
            Self::Watch => "watch",
            Self::AtRisk => "at_risk",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Safe | Self::Low => "✅",
            Self::Watch | Self::Medium => "⚠️",
            Self::AtRisk | Self::High => "🚨",
            Self::Critical => "🔴",
            Self::Other(_) => "📊",
        }
    }

    /// Display label: underscores become spaces, upper-cased (`AT RISK`).
    #[must_use]
    pub fn label(&self) -> String {
        let wire = self.as_wire();
        if wire.is_empty() {
            return "UNKNOWN".to_string();
        }
        wire.replace('_', " ").to_uppercase()
    }

    #[must_use]
    pub fn css_class(&self) -> String {
        let wire = self.as_wire();
        let slug: String = wire
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        if slug.is_empty() {
            "risk-unknown".to_string()
        } else {
            format!("risk-{slug}")
        }
    }

    /// 0 (no concern) to 3 (critical). Unknown values rank as 1.
    #[must_use]
    pub fn severity(&self) -> u8 {
        match self {
            Self::Safe | Self::Low => 0,
            Self::Watch | Self::Medium | Self::Other(_) => 1,
            Self::AtRisk | Self::High => 2,
            Self::Critical => 3,
        }
    }

    /// Levels that call for immediate teacher attention.
    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.severity() >= 2
    }

    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.severity() == 0
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for RiskLevel {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<RiskLevel> for String {
    fn from(value: RiskLevel) -> Self {
        value.as_wire().to_string()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}
