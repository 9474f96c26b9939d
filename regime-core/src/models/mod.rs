mod age_band;
mod deduction_section;
mod deductions;
mod employment_type;
mod regime_result;
mod tax_input;

pub use age_band::AgeBand;
pub use deduction_section::DeductionSection;
pub use deductions::Deductions;
pub use employment_type::EmploymentType;
pub use regime_result::{Comparison, Regime, RegimeResult};
pub use tax_input::{TaxInput, TaxInputError};
