//! UK tax configuration: repayment plan, income-tax bands, National
//! Insurance and student-loan tables keyed by tax year.
//!
//! The table is loaded once by the caller and passed by reference into every
//! calculator that needs it. Nothing in this module is consulted implicitly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PersonalFinanceError;
use crate::types::{Money, Rate};
use crate::PersonalFinanceResult;

/// Bundled thresholds for the 2024-25 and 2025-26 tax years.
const EMBEDDED_UK_TAX_CONFIG: &str = include_str!("../data/uk_tax_thresholds.json");

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Root of the tax configuration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Repayment terms used by the loan-vs-invest projection.
    pub plan_2: PayoffRepaymentPlan,
    /// Per-year tables keyed by tax year label, e.g. `"2024-25"`.
    pub tax_years: BTreeMap<String, TaxYearConfig>,
}

/// Student-loan repayment terms for the payoff engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffRepaymentPlan {
    pub repayment_threshold_2023: Money,
    pub repayment_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub personal_allowance: Money,
    pub personal_allowance_taper_start: Money,
    pub personal_allowance_taper_end: Money,
    /// Income-tax bands keyed by jurisdiction, ordered from the lowest band.
    pub income_tax_bands: BTreeMap<String, Vec<TaxBand>>,
    pub ni: NiConfig,
    pub student_loan_plans: BTreeMap<String, StudentLoanPlan>,
}

/// One slice of taxable income. `to == None` marks the open-ended top band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBand {
    pub name: String,
    pub from: Money,
    pub to: Option<Money>,
    pub rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiConfig {
    pub thresholds: NiThresholds,
    pub categories: BTreeMap<String, NiCategoryRates>,
}

/// Primary threshold and upper earnings limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiThresholds {
    pub pt: Money,
    pub uel: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiCategoryRates {
    pub main_rate: Rate,
    pub upper_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanPlan {
    pub threshold: Money,
    pub rate: Rate,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

impl TaxConfig {
    /// Parse and sanity-check a configuration document.
    pub fn from_json_str(contents: &str) -> PersonalFinanceResult<Self> {
        let config: TaxConfig = serde_json::from_str(contents).map_err(|e| {
            PersonalFinanceError::Configuration(format!("malformed tax configuration: {e}"))
        })?;
        config.check()?;
        debug!(
            tax_years = config.tax_years.len(),
            "tax configuration loaded"
        );
        Ok(config)
    }

    /// Read a configuration document from disk.
    pub fn from_path(path: &Path) -> PersonalFinanceResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PersonalFinanceError::Configuration(format!(
                "cannot read tax configuration '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// The table compiled into the crate.
    pub fn embedded() -> PersonalFinanceResult<Self> {
        Self::from_json_str(EMBEDDED_UK_TAX_CONFIG)
    }

    /// Reject tables no calculator could use safely.
    pub fn check(&self) -> PersonalFinanceResult<()> {
        if self.plan_2.repayment_threshold_2023 < Money::ZERO {
            return Err(PersonalFinanceError::Configuration(
                "plan_2 repayment threshold cannot be negative".into(),
            ));
        }
        check_rate("plan_2 repayment", self.plan_2.repayment_rate)?;

        for (year, cfg) in &self.tax_years {
            if cfg.personal_allowance_taper_end <= cfg.personal_allowance_taper_start {
                return Err(PersonalFinanceError::Configuration(format!(
                    "{year}: personal allowance taper end must exceed taper start"
                )));
            }

            for (jurisdiction, bands) in &cfg.income_tax_bands {
                if bands.is_empty() {
                    return Err(PersonalFinanceError::Configuration(format!(
                        "{year}: no income tax bands for '{jurisdiction}'"
                    )));
                }
                let last = bands.len() - 1;
                let mut previous_end = bands[0].from;
                for (i, band) in bands.iter().enumerate() {
                    check_rate(&format!("{year}: band '{}' in '{jurisdiction}'", band.name), band.rate)?;
                    if band.from < previous_end {
                        return Err(PersonalFinanceError::Configuration(format!(
                            "{year}: band '{}' in '{jurisdiction}' overlaps the band before it",
                            band.name
                        )));
                    }
                    match band.to {
                        Some(to) if to < band.from => {
                            return Err(PersonalFinanceError::Configuration(format!(
                                "{year}: band '{}' in '{jurisdiction}' ends before it starts",
                                band.name
                            )));
                        }
                        None if i != last => {
                            return Err(PersonalFinanceError::Configuration(format!(
                                "{year}: only the last band in '{jurisdiction}' may be open-ended, found '{}'",
                                band.name
                            )));
                        }
                        _ => {}
                    }
                    previous_end = band.to.unwrap_or(band.from);
                }
            }

            if cfg.ni.thresholds.uel < cfg.ni.thresholds.pt {
                return Err(PersonalFinanceError::Configuration(format!(
                    "{year}: NI upper earnings limit is below the primary threshold"
                )));
            }
            for (category, rates) in &cfg.ni.categories {
                check_rate(&format!("{year}: NI category '{category}' main"), rates.main_rate)?;
                check_rate(&format!("{year}: NI category '{category}' upper"), rates.upper_rate)?;
            }
            for (plan, terms) in &cfg.student_loan_plans {
                check_rate(&format!("{year}: student loan plan '{plan}'"), terms.rate)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn tax_year(&self, key: &str) -> PersonalFinanceResult<&TaxYearConfig> {
        self.tax_years.get(key).ok_or_else(|| {
            PersonalFinanceError::Configuration(format!("unknown tax year '{key}'"))
        })
    }

    pub fn payoff_plan(&self) -> &PayoffRepaymentPlan {
        &self.plan_2
    }
}

impl TaxYearConfig {
    pub fn bands(&self, jurisdiction: &str) -> PersonalFinanceResult<&[TaxBand]> {
        self.income_tax_bands
            .get(jurisdiction)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                PersonalFinanceError::Configuration(format!(
                    "no income tax bands for jurisdiction '{jurisdiction}'"
                ))
            })
    }

    pub fn student_loan_plan(&self, plan: &str) -> PersonalFinanceResult<&StudentLoanPlan> {
        self.student_loan_plans.get(plan).ok_or_else(|| {
            PersonalFinanceError::Configuration(format!("unknown student loan plan '{plan}'"))
        })
    }
}

impl NiConfig {
    pub fn category(&self, category: &str) -> PersonalFinanceResult<&NiCategoryRates> {
        self.categories.get(category).ok_or_else(|| {
            PersonalFinanceError::Configuration(format!("unknown NI category '{category}'"))
        })
    }
}

/// Deduction rates are fractions of income; above 1 a deduction could exceed
/// the income it is taken from.
fn check_rate(label: &str, rate: Rate) -> PersonalFinanceResult<()> {
    if rate < Rate::ZERO || rate > Rate::ONE {
        return Err(PersonalFinanceError::Configuration(format!(
            "{label} rate {rate} must be between 0 and 1"
        )));
    }
    Ok(())
}
