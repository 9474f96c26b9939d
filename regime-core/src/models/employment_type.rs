use serde::{Deserialize, Serialize};

/// How the taxpayer earns their income.
///
/// Only [`EmploymentType::Salaried`] qualifies for the old-regime standard
/// deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Salaried,
    #[serde(alias = "self-employed")]
    SelfEmployed,
    Business,
    Freelancer,
}

impl EmploymentType {
    pub fn all() -> &'static [EmploymentType] {
        &[
            EmploymentType::Salaried,
            EmploymentType::SelfEmployed,
            EmploymentType::Business,
            EmploymentType::Freelancer,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salaried => "salaried",
            Self::SelfEmployed => "self_employed",
            Self::Business => "business",
            Self::Freelancer => "freelancer",
        }
    }

    /// Case-insensitive; hyphens and underscores are interchangeable.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "salaried" => Some(Self::Salaried),
            "self_employed" | "selfemployed" => Some(Self::SelfEmployed),
            "business" => Some(Self::Business),
            "freelancer" => Some(Self::Freelancer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Salaried => "Salaried",
            Self::SelfEmployed => "Self-employed",
            Self::Business => "Business",
            Self::Freelancer => "Freelancer",
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
