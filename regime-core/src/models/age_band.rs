use serde::{Deserialize, Serialize};

/// Age bracket of the taxpayer.
///
/// Drives the old-regime exemption threshold and the 80D cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "below_60", alias = "below60")]
    BelowSixty,
    #[serde(rename = "senior_60_to_80", alias = "60to80")]
    Senior,
    #[serde(rename = "super_senior_above_80", alias = "above80")]
    SuperSenior,
}

impl AgeBand {
    pub fn all() -> &'static [AgeBand] {
        &[AgeBand::BelowSixty, AgeBand::Senior, AgeBand::SuperSenior]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelowSixty => "below_60",
            Self::Senior => "senior_60_to_80",
            Self::SuperSenior => "super_senior_above_80",
        }
    }

    /// Accepts the canonical names as well as the short forms `below60`,
    /// `60to80` and `above80`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "below_60" | "below60" => Some(Self::BelowSixty),
            "senior_60_to_80" | "60to80" | "senior" => Some(Self::Senior),
            "super_senior_above_80" | "above80" | "super_senior" => Some(Self::SuperSenior),
            _ => None,
        }
    }

    /// True for every band aged 60 or over.
    pub fn is_senior(&self) -> bool {
        matches!(self, Self::Senior | Self::SuperSenior)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BelowSixty => "Below 60",
            Self::Senior => "60 to 80",
            Self::SuperSenior => "Above 80",
        }
    }
}

impl std::fmt::Display for AgeBand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
