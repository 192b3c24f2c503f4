use personal_finance_core::emergency_fund::{calculate_emergency_fund, EmergencyFundInput};
use personal_finance_core::freedom::{calculate_time_to_freedom, TimeToFreedomInput};
use personal_finance_core::income_tax::{calculate_income_tax, TaxCalculationInput};
use personal_finance_core::rent_vs_buy::{calculate_rent_vs_buy, RentVsBuyInput};
use personal_finance_core::resilience::{calculate_resilience_score, ResilienceScoreInput};
use personal_finance_core::serialize::{parse_input, to_json};
use personal_finance_core::{PersonalFinanceError, TaxConfig};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Income tax
// ===========================================================================

#[test]
fn test_income_tax_from_json_payload() {
    let input: TaxCalculationInput = parse_input(json!({
        "gross_income": "50000",
        "pay_frequency": "annual",
        "tax_jurisdiction": "england_wales_ni",
        "ni_category": "A",
        "student_loan_plan": "plan_2",
        "tax_year": "2024-25"
    }))
    .unwrap();
    assert_eq!(input.pension_contribution_type, "none");

    let config = TaxConfig::embedded().unwrap();
    let out = calculate_income_tax(&input, &config).unwrap();
    let body = to_json(&out.result).unwrap();

    assert_eq!(body["tax_year"], "2024-25");
    assert_eq!(body["gross_annual"], json!(50000.0));
    assert_eq!(body["income_tax_annual"], json!(7486.0));
    assert_eq!(body["ni_annual"], json!(2994.4));
    assert_eq!(body["student_loan_annual"], json!(2043.45));
    assert_eq!(body["net_annual"], json!(37476.15));
    assert_eq!(body["income_tax_bands"][0]["band_name"], "basic");
    assert_eq!(body["ni_bands"].as_array().unwrap().len(), 2);
}

#[test]
fn test_income_tax_collects_tag_violations() {
    let input: TaxCalculationInput = parse_input(json!({
        "gross_income": -10,
        "pay_frequency": "fortnightly",
        "tax_jurisdiction": "wales",
        "ni_category": "A",
        "student_loan_plan": "plan_2",
        "tax_year": "2024-25"
    }))
    .unwrap();
    let err = calculate_income_tax(&input, &TaxConfig::embedded().unwrap()).unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "Gross income: Value cannot be negative".to_string(),
            "Pay frequency must be one of: annual, monthly, weekly".to_string(),
            "Tax jurisdiction must be one of: england_wales_ni, scotland".to_string(),
        ]
    );
}

#[test]
fn test_non_numeric_payload_is_malformed() {
    let err = parse_input::<TaxCalculationInput>(json!({
        "gross_income": "lots",
        "pay_frequency": "annual",
        "tax_jurisdiction": "scotland",
        "ni_category": "A",
        "student_loan_plan": "none",
        "tax_year": "2024-25"
    }))
    .unwrap_err();
    assert!(matches!(err, PersonalFinanceError::MalformedInput(_)));
    assert!(err.is_client_error());
}

// ===========================================================================
// Rent vs buy
// ===========================================================================

#[test]
fn test_rent_vs_buy_defaults_and_keys() {
    let input: RentVsBuyInput = parse_input(json!({
        "property_price": 200000,
        "deposit_amount": 50000,
        "mortgage_rate": 0,
        "mortgage_term_years": 25,
        "monthly_rent": 1000,
        "rent_growth_rate": 0,
        "home_appreciation_rate": 0,
        "maintenance_rate": 0,
        "investment_return_rate": 0,
        "analysis_years": 3
    }))
    .unwrap();
    assert_eq!(input.selling_costs, dec!(0));

    let out = calculate_rent_vs_buy(&input).unwrap();
    let body = to_json(&out.result).unwrap();
    assert_eq!(body["monthly_mortgage_payment"], json!(500.0));
    assert_eq!(body["graph_series"].as_array().unwrap().len(), 3);
    assert_eq!(body["graph_series"][2]["year"], 3);
    assert_eq!(body["graph_series"][2]["rent_cost"], json!(36000.0));
    assert_eq!(body["break_even_year"], 1);
    assert!(body["summary"].as_str().unwrap().starts_with("Buying leaves a higher net worth"));
}

#[test]
fn test_rent_vs_buy_deposit_above_price() {
    let input = RentVsBuyInput {
        property_price: dec!(100000),
        deposit_amount: dec!(150000),
        mortgage_rate: dec!(0.05),
        mortgage_term_years: 25,
        monthly_rent: dec!(800),
        rent_growth_rate: dec!(0.02),
        home_appreciation_rate: dec!(0.03),
        maintenance_rate: dec!(0.01),
        property_tax_rate: dec!(0),
        insurance_annual: dec!(0),
        buying_costs: dec!(0),
        selling_costs: dec!(0),
        investment_return_rate: dec!(0.05),
        analysis_years: 10,
    };
    let err = calculate_rent_vs_buy(&input).unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Deposit amount cannot exceed property price".to_string()]
    );
}

// ===========================================================================
// Emergency fund, resilience, freedom
// ===========================================================================

#[test]
fn test_emergency_fund_default_savings() {
    let input: EmergencyFundInput =
        parse_input(json!({ "monthly_expenses": 1500, "target_months": 6 })).unwrap();
    let body = to_json(&calculate_emergency_fund(&input).unwrap().result).unwrap();
    assert_eq!(body["target_fund"], json!(9000.0));
    assert_eq!(body["savings_gap"], json!(9000.0));
    assert_eq!(body["coverage_months"], json!(0.0));
    assert_eq!(body["funded_pct"], json!(0.0));
}

#[test]
fn test_emergency_fund_zero_expenses_is_null() {
    let input = EmergencyFundInput {
        monthly_expenses: dec!(0),
        target_months: 3,
        current_savings: dec!(500),
    };
    let body = to_json(&calculate_emergency_fund(&input).unwrap().result).unwrap();
    assert!(body["coverage_months"].is_null());
}

#[test]
fn test_resilience_json_shape() {
    let input: ResilienceScoreInput = parse_input(json!({
        "savings": 5000,
        "income_stability": 80,
        "debt_load": 1000,
        "insurance_coverage": 60
    }))
    .unwrap();
    let body = to_json(&calculate_resilience_score(&input).unwrap().result).unwrap();
    assert_eq!(body["resilience_index"], 67);
    assert_eq!(body["band"], "moderate");
    assert_eq!(body["weak_points"], json!([]));
}

#[test]
fn test_resilience_score_out_of_range() {
    let input = ResilienceScoreInput {
        savings: dec!(100),
        income_stability: 101,
        debt_load: dec!(0),
        insurance_coverage: 50,
    };
    let err = calculate_resilience_score(&input).unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Income stability: Score must be between 0 and 100".to_string()]
    );
}

#[test]
fn test_freedom_timeline() {
    let input: TimeToFreedomInput = parse_input(json!({
        "annual_expenses": 4000,
        "current_investments": 0,
        "annual_contribution": 10000,
        "investment_return_rate": 0,
        "safe_withdrawal_rate": 0.04
    }))
    .unwrap();
    let out = calculate_time_to_freedom(&input).unwrap();
    let body = to_json(&out.result).unwrap();
    assert_eq!(body["freedom_number"], json!(100000.0));
    assert_eq!(body["years_to_freedom"], 10);
    let series = body["timeline_series"].as_array().unwrap();
    assert_eq!(series.len(), 11);
    assert_eq!(series[0]["portfolio_value"], json!(0.0));
    assert_eq!(series[10]["progress_pct"], json!(1.0));
}

#[test]
fn test_freedom_zero_withdrawal_rate_rejected() {
    let input = TimeToFreedomInput {
        annual_expenses: dec!(30000),
        current_investments: dec!(0),
        annual_contribution: dec!(5000),
        investment_return_rate: dec!(0.05),
        safe_withdrawal_rate: dec!(0),
    };
    let err = calculate_time_to_freedom(&input).unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Safe withdrawal rate must be greater than 0".to_string()]
    );
}
