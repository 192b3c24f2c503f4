//! Rent versus buy over a fixed horizon.
//!
//! The buyer amortises a fixed-rate repayment mortgage month by month and
//! carries upkeep, property tax and insurance. The renter keeps the up-front
//! cash invested and adds to it whenever owning would have cost more than
//! renting that year.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{overflow, ValidationRule, Violation};
use crate::serialize::{self, currency_text};
use crate::time_value::{annuity_payment, compound, future_value};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{check_fraction, check_int_range, check_non_negative, field_title, into_result};
use crate::PersonalFinanceResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Rates are fractions (0.045 = 4.5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyInput {
    pub property_price: Money,
    pub deposit_amount: Money,
    pub mortgage_rate: Rate,
    pub mortgage_term_years: i64,
    pub monthly_rent: Money,
    pub rent_growth_rate: Rate,
    pub home_appreciation_rate: Rate,
    /// Annual upkeep as a fraction of home value.
    pub maintenance_rate: Rate,
    #[serde(default)]
    pub property_tax_rate: Rate,
    #[serde(default)]
    pub insurance_annual: Money,
    #[serde(default)]
    pub buying_costs: Money,
    /// Deducted from the buyer's equity when measuring net worth.
    #[serde(default)]
    pub selling_costs: Money,
    pub investment_return_rate: Rate,
    pub analysis_years: i64,
}

impl RentVsBuyInput {
    pub fn validate(&self) -> Vec<Violation> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("property_price", self.property_price),
            ("deposit_amount", self.deposit_amount),
            ("monthly_rent", self.monthly_rent),
            ("insurance_annual", self.insurance_annual),
            ("buying_costs", self.buying_costs),
            ("selling_costs", self.selling_costs),
        ] {
            check_non_negative(&mut errors, field, &field_title(field), value);
        }

        for (field, value) in [
            ("mortgage_rate", self.mortgage_rate),
            ("rent_growth_rate", self.rent_growth_rate),
            ("home_appreciation_rate", self.home_appreciation_rate),
            ("maintenance_rate", self.maintenance_rate),
            ("property_tax_rate", self.property_tax_rate),
            ("investment_return_rate", self.investment_return_rate),
        ] {
            check_fraction(&mut errors, field, &field_title(field), value);
        }

        check_int_range(
            &mut errors,
            "mortgage_term_years",
            "Mortgage term years",
            self.mortgage_term_years,
            (1, 50),
        );
        check_int_range(&mut errors, "analysis_years", "Analysis years", self.analysis_years, (1, 60));

        if self.deposit_amount > self.property_price {
            errors.push(Violation::new(
                "deposit_amount",
                ValidationRule::Consistency,
                "Deposit amount cannot exceed property price",
            ));
        }
        errors
    }
}

/// One analysis year. Costs are cumulative to the end of the year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentVsBuyYear {
    pub year: u32,
    #[serde(serialize_with = "serialize::money")]
    pub rent_cost: Money,
    #[serde(serialize_with = "serialize::money")]
    pub buy_cost: Money,
    #[serde(serialize_with = "serialize::money")]
    pub home_value: Money,
    #[serde(serialize_with = "serialize::money")]
    pub mortgage_balance: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_worth_rent: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_worth_buy: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentVsBuyResult {
    #[serde(serialize_with = "serialize::money")]
    pub monthly_mortgage_payment: Money,
    #[serde(serialize_with = "serialize::money")]
    pub total_cost_rent: Money,
    #[serde(serialize_with = "serialize::money")]
    pub total_cost_buy: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_worth_rent: Money,
    #[serde(serialize_with = "serialize::money")]
    pub net_worth_buy: Money,
    /// First year buying leaves at least as much net worth as renting.
    pub break_even_year: Option<u32>,
    pub summary: String,
    pub graph_series: Vec<RentVsBuyYear>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Year-by-year comparison of owning against renting and investing.
pub fn calculate_rent_vs_buy(
    input: &RentVsBuyInput,
) -> PersonalFinanceResult<ComputationOutput<RentVsBuyResult>> {
    let start = Instant::now();
    into_result("rent_vs_buy", input.validate())?;

    // Validated ranges: term 1..=50, analysis 1..=60.
    let term_months = input.mortgage_term_years as u32 * MONTHS_PER_YEAR;
    let analysis_years = input.analysis_years as u32;

    info!(
        property_price = %input.property_price,
        analysis_years,
        "starting rent vs buy comparison"
    );

    let principal = input.property_price - input.deposit_amount;
    let monthly_rate = input.mortgage_rate / dec!(12);
    let monthly_payment = annuity_payment(principal, monthly_rate, term_months)?;
    let even_principal = principal / Decimal::from(term_months);

    let upfront = input
        .deposit_amount
        .checked_add(input.buying_costs)
        .ok_or_else(|| overflow("up-front purchase cost"))?;
    let upkeep_rate = input.maintenance_rate + input.property_tax_rate;
    let annual_rent = input
        .monthly_rent
        .checked_mul(dec!(12))
        .ok_or_else(|| overflow("annual rent"))?;

    let mut home_value = input.property_price;
    let mut balance = principal;
    let mut months_paid: u32 = 0;
    let mut portfolio = upfront;
    let mut total_cost_rent = Decimal::ZERO;
    let mut total_cost_buy = upfront;
    let mut break_even_year = None;
    let mut net_worth_buy = input.deposit_amount - input.selling_costs;
    let mut graph_series = Vec::with_capacity(analysis_years as usize);

    for year in 1..=analysis_years {
        let rent = compound(input.rent_growth_rate, year - 1)?
            .checked_mul(annual_rent)
            .ok_or_else(|| overflow("rent growth"))?;

        let mut mortgage_paid = Decimal::ZERO;
        for _ in 0..MONTHS_PER_YEAR {
            if balance <= Decimal::ZERO || months_paid >= term_months {
                break;
            }
            let interest = balance * monthly_rate;
            let principal_paid = if monthly_rate.is_zero() {
                even_principal.min(balance)
            } else {
                (monthly_payment - interest).min(balance)
            };
            mortgage_paid = mortgage_paid
                .checked_add(interest + principal_paid)
                .ok_or_else(|| overflow("mortgage payments"))?;
            balance -= principal_paid;
            months_paid += 1;
        }

        let owning_cost = home_value
            .checked_mul(upkeep_rate)
            .and_then(|upkeep| upkeep.checked_add(mortgage_paid))
            .and_then(|cost| cost.checked_add(input.insurance_annual))
            .ok_or_else(|| overflow("owning cost"))?;
        home_value = home_value
            .checked_mul(Decimal::ONE + input.home_appreciation_rate)
            .ok_or_else(|| overflow("home appreciation"))?;

        let surplus = (owning_cost - rent).max(Decimal::ZERO);
        portfolio = future_value(portfolio, input.investment_return_rate, surplus, 1)?;

        net_worth_buy = (home_value - balance)
            .checked_sub(input.selling_costs)
            .ok_or_else(|| overflow("buyer net worth"))?;
        total_cost_rent = total_cost_rent
            .checked_add(rent)
            .ok_or_else(|| overflow("cumulative rent"))?;
        total_cost_buy = total_cost_buy
            .checked_add(owning_cost)
            .ok_or_else(|| overflow("cumulative owning cost"))?;

        if break_even_year.is_none() && net_worth_buy >= portfolio {
            break_even_year = Some(year);
        }

        graph_series.push(RentVsBuyYear {
            year,
            rent_cost: total_cost_rent,
            buy_cost: total_cost_buy,
            home_value,
            mortgage_balance: balance,
            net_worth_rent: portfolio,
            net_worth_buy,
        });
    }

    let summary = summarize(analysis_years, portfolio, net_worth_buy, break_even_year);
    let mut warnings = Vec::new();
    if break_even_year.is_none() {
        warnings.push(format!(
            "Buying never matches renting on net worth within {analysis_years} years"
        ));
    }

    let output = RentVsBuyResult {
        monthly_mortgage_payment: monthly_payment,
        total_cost_rent,
        total_cost_buy,
        net_worth_rent: portfolio,
        net_worth_buy,
        break_even_year,
        summary,
        graph_series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs buy: monthly repayment-mortgage amortisation against an invested renter portfolio",
        &json!({
            "renter_starting_portfolio": "deposit plus buying costs",
            "renter_contributions": "annual excess of owning cost over rent",
            "buyer_net_worth": "home value less mortgage balance less selling costs",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn summarize(years: u32, rent: Money, buy: Money, break_even: Option<u32>) -> String {
    let lead = if buy >= rent {
        format!(
            "Buying leaves a higher net worth after {years} years ({} vs {} renting).",
            currency_text(buy),
            currency_text(rent)
        )
    } else {
        format!(
            "Renting and investing leaves a higher net worth after {years} years ({} vs {} buying).",
            currency_text(rent),
            currency_text(buy)
        )
    };
    match break_even {
        Some(year) => format!("{lead} Buying breaks even with renting in year {year}."),
        None => format!("{lead} Buying does not break even within the analysis period."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersonalFinanceError;

    fn zero_rate_input() -> RentVsBuyInput {
        RentVsBuyInput {
            property_price: dec!(200000),
            deposit_amount: dec!(50000),
            mortgage_rate: Decimal::ZERO,
            mortgage_term_years: 25,
            monthly_rent: dec!(1000),
            rent_growth_rate: Decimal::ZERO,
            home_appreciation_rate: Decimal::ZERO,
            maintenance_rate: Decimal::ZERO,
            property_tax_rate: Decimal::ZERO,
            insurance_annual: Decimal::ZERO,
            buying_costs: Decimal::ZERO,
            selling_costs: Decimal::ZERO,
            investment_return_rate: Decimal::ZERO,
            analysis_years: 1,
        }
    }

    fn run(input: &RentVsBuyInput) -> ComputationOutput<RentVsBuyResult> {
        calculate_rent_vs_buy(input).unwrap()
    }

    // ---------------------------------------------------------------
    // 1. Zero-rate mortgage splits principal evenly
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_rate_first_year() {
        let out = run(&zero_rate_input());
        let r = &out.result;
        assert_eq!(r.monthly_mortgage_payment, dec!(500));
        assert_eq!(r.graph_series[0].mortgage_balance, dec!(144000));
        assert_eq!(r.total_cost_rent, dec!(12000));
        assert_eq!(r.total_cost_buy, dec!(56000));
        assert_eq!(r.net_worth_buy, dec!(56000));
        assert_eq!(r.net_worth_rent, dec!(50000));
        assert_eq!(r.break_even_year, Some(1));
        assert!(out.warnings.is_empty());
    }

    // ---------------------------------------------------------------
    // 2. Surplus flows into the renter's portfolio
    // ---------------------------------------------------------------
    #[test]
    fn test_surplus_invested() {
        let mut input = zero_rate_input();
        input.monthly_rent = dec!(200);
        let r = run(&input).result;
        assert_eq!(r.net_worth_rent, dec!(53600));
    }

    // ---------------------------------------------------------------
    // 3. Mortgage ends before the horizon
    // ---------------------------------------------------------------
    #[test]
    fn test_short_term_mortgage_clears() {
        let mut input = zero_rate_input();
        input.mortgage_term_years = 1;
        input.analysis_years = 3;
        let r = run(&input).result;
        assert_eq!(r.graph_series[0].mortgage_balance, Decimal::ZERO);
        assert_eq!(r.graph_series.len(), 3);
        // Year 1 pays 150k; later years carry no mortgage cost.
        assert_eq!(r.total_cost_buy, dec!(200000));
    }

    #[test]
    fn test_interest_bearing_mortgage_amortises() {
        let mut input = zero_rate_input();
        input.mortgage_rate = dec!(0.05);
        input.mortgage_term_years = 25;
        input.analysis_years = 25;
        let r = run(&input).result;
        assert!((r.monthly_mortgage_payment - dec!(876.89)).abs() < dec!(0.01));
        assert!(r.graph_series.last().unwrap().mortgage_balance.abs() < dec!(0.01));
    }

    // ---------------------------------------------------------------
    // 4. No break-even
    // ---------------------------------------------------------------
    #[test]
    fn test_never_breaks_even() {
        let mut input = zero_rate_input();
        input.selling_costs = dec!(100000);
        input.analysis_years = 2;
        let out = run(&input);
        assert_eq!(out.result.break_even_year, None);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.result.summary.starts_with("Renting and investing leaves a higher net worth after 2 years"));
    }

    // ---------------------------------------------------------------
    // 5. Validation
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_messages() {
        let mut input = zero_rate_input();
        input.monthly_rent = dec!(-1);
        input.mortgage_rate = dec!(1.2);
        input.analysis_years = 61;
        input.deposit_amount = dec!(250000);
        let err = calculate_rent_vs_buy(&input).unwrap_err();
        let PersonalFinanceError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Monthly Rent: Value cannot be negative",
                "Mortgage Rate: Rate must be between 0 and 1",
                "Analysis years: Value must be between 1 and 60",
                "Deposit amount cannot exceed property price",
            ]
        );
    }

    // ---------------------------------------------------------------
    // 6. Decimal range
    // ---------------------------------------------------------------
    #[test]
    fn test_rent_growth_past_decimal_range() {
        let input = RentVsBuyInput {
            monthly_rent: dec!(100000000000000000000),
            rent_growth_rate: Decimal::ONE,
            analysis_years: 60,
            ..zero_rate_input()
        };
        assert!(input.validate().is_empty());
        let err = calculate_rent_vs_buy(&input).unwrap_err();
        assert!(matches!(err, PersonalFinanceError::Overflow { .. }));
        assert!(!err.is_client_error());
    }
}
