use serde::{Deserialize, Serialize};

/// A deduction head that can be claimed against income.
///
/// Codes follow the statutory section numbers where one exists.
///
/// | Code    | Field in [`Deductions`](crate::Deductions) |
/// |---------|---------------------------------------------|
/// | `80C`   | `section_80c`                               |
/// | `80D`   | `section_80d`                               |
/// | `80G`   | `section_80g`                               |
/// | `24`    | `home_loan_interest`                        |
/// | `HRA`   | `hra_exemption`                             |
/// | `80E`   | `education_loan_interest`                   |
/// | `80CCD` | `nps`                                       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeductionSection {
    #[serde(rename = "80C")]
    Section80C,
    #[serde(rename = "80D")]
    Section80D,
    #[serde(rename = "80G")]
    Section80G,
    #[serde(rename = "24")]
    HomeLoanInterest,
    #[serde(rename = "HRA")]
    HraExemption,
    #[serde(rename = "80E")]
    EducationLoanInterest,
    #[serde(rename = "80CCD")]
    Nps,
}

impl DeductionSection {
    pub fn all() -> &'static [DeductionSection] {
        &[
            DeductionSection::Section80C,
            DeductionSection::Section80D,
            DeductionSection::Section80G,
            DeductionSection::HomeLoanInterest,
            DeductionSection::HraExemption,
            DeductionSection::EducationLoanInterest,
            DeductionSection::Nps,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section80C => "80C",
            Self::Section80D => "80D",
            Self::Section80G => "80G",
            Self::HomeLoanInterest => "24",
            Self::HraExemption => "HRA",
            Self::EducationLoanInterest => "80E",
            Self::Nps => "80CCD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "80C" => Some(Self::Section80C),
            "80D" => Some(Self::Section80D),
            "80G" => Some(Self::Section80G),
            "24" | "24B" | "24(B)" => Some(Self::HomeLoanInterest),
            "HRA" | "10(13A)" => Some(Self::HraExemption),
            "80E" => Some(Self::EducationLoanInterest),
            "80CCD" | "80CCD(1B)" | "NPS" => Some(Self::Nps),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Section80C => "80C (PPF/ELSS/Insurance)",
            Self::Section80D => "80D (Health)",
            Self::Section80G => "80G (Donations)",
            Self::HomeLoanInterest => "24 (Home Loan Interest)",
            Self::HraExemption => "HRA Exemption",
            Self::EducationLoanInterest => "80E (Education Loan Interest)",
            Self::Nps => "80CCD (NPS)",
        }
    }
}

impl std::fmt::Display for DeductionSection {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_code() {
        for section in DeductionSection::all() {
            assert_eq!(DeductionSection::parse(section.as_str()), Some(*section));
        }
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(
            DeductionSection::parse("24(b)"),
            Some(DeductionSection::HomeLoanInterest)
        );
        assert_eq!(DeductionSection::parse("nps"), Some(DeductionSection::Nps));
        assert_eq!(DeductionSection::parse("80c"), Some(DeductionSection::Section80C));
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(DeductionSection::parse("80TTA"), None);
    }
}
