//! Plain-text receipt extraction.
//!
//! Receipts arrive as already-extracted text (OCR or copy-paste). The parser
//! decides which deduction section a receipt belongs to and pulls out the
//! claimable amount:
//!
//! 1. An explicit section reference (`u/s 80D`, `Section 80C`) wins.
//! 2. Otherwise the first keyword rule that matches decides the section.
//! 3. The amount is the largest figure that is either prefixed by a currency
//!    marker (`₹`, `Rs.`, `INR`) or follows a label such as `Total` or
//!    `Premium`.
//! 4. The vendor is the first non-blank line.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionSuggestion, DeductionSuggestionSource, SuggestionError};
use crate::DeductionSection;
use crate::utils::parse_amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptExtraction {
    pub section: DeductionSection,
    pub amount: Decimal,
    pub vendor: Option<String>,
}

static SECTION_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:u/s|under\s+section|section|sec\.?)\s*(80\s*ccd(?:\s*\(?1b\)?)?|80\s*[cdeg]|24(?:\s*\(?b\)?)?)")
        .expect("section reference pattern is a valid regex")
});

static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:₹|\brs\.?|\binr)\s*(\d[\d,]*(?:\.\d{1,2})?)")
        .expect("currency amount pattern is a valid regex")
});

static LABELLED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:total|amount|premium|paid|net\s+payable|contribution)\b[^\d\n]*(\d[\d,]*(?:\.\d{1,2})?)",
    )
    .expect("labelled amount pattern is a valid regex")
});

static SECTION_KEYWORDS: LazyLock<Vec<(Regex, DeductionSection)>> = LazyLock::new(|| {
    [
        (
            r"(?i)health\s+insurance|mediclaim|medical\s+insurance|hospital|diagnostic|health\s+check",
            DeductionSection::Section80D,
        ),
        (
            r"(?i)(home|housing)\s+loan",
            DeductionSection::HomeLoanInterest,
        ),
        (r"(?i)education\s+loan", DeductionSection::EducationLoanInterest),
        (
            r"(?i)\bnps\b|national\s+pension",
            DeductionSection::Nps,
        ),
        (
            r"(?i)donation|charitable|\btrust\b|\bngo\b|\bpm\s*cares\b",
            DeductionSection::Section80G,
        ),
        (
            r"(?i)rent\s+receipt|house\s+rent|landlord",
            DeductionSection::HraExemption,
        ),
        (
            r"(?i)\blic\b|life\s+insurance|term\s+(?:insurance|plan)|\belss\b|\bppf\b|tuition|school\s+fees?|\bnsc\b|sukanya",
            DeductionSection::Section80C,
        ),
    ]
    .into_iter()
    .map(|(pattern, section)| {
        (
            Regex::new(pattern).expect("section keyword pattern is a valid regex"),
            section,
        )
    })
    .collect()
});

/// Stateless receipt text parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptParser;

impl ReceiptParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts a deduction from `text`; `name` only labels errors.
    ///
    /// # Errors
    ///
    /// - [`SuggestionError::UnknownSection`] when no section can be inferred.
    /// - [`SuggestionError::NoAmount`] when no marked amount is present.
    pub fn parse(
        &self,
        name: &str,
        text: &str,
    ) -> Result<ReceiptExtraction, SuggestionError> {
        let section = self
            .detect_section(text)
            .ok_or_else(|| SuggestionError::UnknownSection {
                receipt: name.to_string(),
            })?;
        let amount = self
            .detect_amount(text)
            .ok_or_else(|| SuggestionError::NoAmount {
                receipt: name.to_string(),
            })?;
        let vendor = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);

        tracing::debug!(receipt = name, section = %section, amount = %amount, "parsed receipt");

        Ok(ReceiptExtraction {
            section,
            amount,
            vendor,
        })
    }

    fn detect_section(
        &self,
        text: &str,
    ) -> Option<DeductionSection> {
        let explicit = SECTION_REFERENCE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|code| {
                let compact: String = code.as_str().split_whitespace().collect();
                DeductionSection::parse(&compact)
            });

        explicit.or_else(|| {
            SECTION_KEYWORDS
                .iter()
                .find(|(pattern, _)| pattern.is_match(text))
                .map(|(_, section)| *section)
        })
    }

    fn detect_amount(
        &self,
        text: &str,
    ) -> Option<Decimal> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .chain(LABELLED_AMOUNT.captures_iter(text))
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| parse_amount(m.as_str()).ok())
            .filter(|amount| *amount > Decimal::ZERO)
            .max()
    }
}

/// A set of named receipt texts treated as one suggestion source.
#[derive(Debug, Clone, Default)]
pub struct ReceiptBatch {
    parser: ReceiptParser,
    receipts: Vec<(String, String)>,
}

impl ReceiptBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.receipts.push((name.into(), text.into()));
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Parses every receipt, failing on the first unreadable one.
    pub fn extract_all(&self) -> Result<Vec<ReceiptExtraction>, SuggestionError> {
        self.receipts
            .iter()
            .map(|(name, text)| self.parser.parse(name, text))
            .collect()
    }
}

impl DeductionSuggestionSource for ReceiptBatch {
    fn name(&self) -> &str {
        "receipts"
    }

    fn suggest(&self) -> Result<DeductionSuggestion, SuggestionError> {
        let mut suggestion = DeductionSuggestion::new();
        for extraction in self.extract_all()? {
            suggestion.add(extraction.section, extraction.amount);
        }
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const LIC_RECEIPT: &str = "\
Life Insurance Corporation of India
Premium Receipt
Policy No: 881234567
Date: 10/01/2024
Premium Amount: Rs. 10,000.00
Late fee: Rs. 0
";

    const HOSPITAL_BILL: &str = "
  City Care Hospital

Consultation   ₹ 800
Medicines      ₹ 1,200
Total          ₹ 2,000
";

    const DONATION: &str = "\
Helping Hands Foundation
Received with thanks a donation of INR 4000
Eligible for deduction under section 80G
";

    // =========================================================================
    // Single receipts
    // =========================================================================

    #[test]
    fn parses_life_insurance_premium() {
        let extraction = ReceiptParser::new().parse("lic.txt", LIC_RECEIPT).unwrap();

        assert_eq!(
            extraction,
            ReceiptExtraction {
                section: DeductionSection::Section80C,
                amount: dec!(10000.00),
                vendor: Some("Life Insurance Corporation of India".to_string()),
            }
        );
    }

    #[test]
    fn takes_largest_marked_amount() {
        let extraction = ReceiptParser::new()
            .parse("hospital.txt", HOSPITAL_BILL)
            .unwrap();

        assert_eq!(extraction.section, DeductionSection::Section80D);
        assert_eq!(extraction.amount, dec!(2000));
        assert_eq!(extraction.vendor.as_deref(), Some("City Care Hospital"));
    }

    #[test]
    fn explicit_section_reference_wins() {
        let text = "Apollo Pharmacy\nHealth insurance top-up\nClaimable u/s 80C\nTotal: 5,500";

        let extraction = ReceiptParser::new().parse("odd.txt", text).unwrap();

        assert_eq!(extraction.section, DeductionSection::Section80C);
        assert_eq!(extraction.amount, dec!(5500));
    }

    #[test]
    fn unmarked_numbers_are_ignored() {
        let text = "Donation receipt\nReceipt no 99871\nThank you";

        let result = ReceiptParser::new().parse("donation.txt", text);

        assert_eq!(
            result,
            Err(SuggestionError::NoAmount {
                receipt: "donation.txt".to_string()
            })
        );
    }

    #[test]
    fn unknown_section_is_reported() {
        let result = ReceiptParser::new().parse("cafe.txt", "Blue Tokai Coffee\nTotal ₹ 450");

        assert_eq!(
            result,
            Err(SuggestionError::UnknownSection {
                receipt: "cafe.txt".to_string()
            })
        );
    }

    // =========================================================================
    // Batches
    // =========================================================================

    #[test]
    fn batch_sums_by_section() {
        let mut batch = ReceiptBatch::new();
        batch.push("lic.txt", LIC_RECEIPT);
        batch.push("hospital.txt", HOSPITAL_BILL);
        batch.push("donation.txt", DONATION);
        batch.push("ppf.txt", "SBI PPF Account\nContribution: Rs 5,000");

        let suggestion = batch.suggest().unwrap();

        assert_eq!(suggestion.annual_income, None);
        assert_eq!(suggestion.amount(DeductionSection::Section80C), dec!(15000));
        assert_eq!(suggestion.amount(DeductionSection::Section80D), dec!(2000));
        assert_eq!(suggestion.amount(DeductionSection::Section80G), dec!(4000));
    }

    #[test]
    fn batch_fails_on_unreadable_receipt() {
        let mut batch = ReceiptBatch::new();
        batch.push("lic.txt", LIC_RECEIPT);
        batch.push("blank.txt", "");

        assert!(matches!(
            batch.suggest(),
            Err(SuggestionError::UnknownSection { receipt }) if receipt == "blank.txt"
        ));
    }
}
