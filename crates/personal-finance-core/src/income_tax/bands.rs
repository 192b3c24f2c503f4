use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{NiCategoryRates, NiThresholds, TaxBand, TaxYearConfig};
use crate::serialize;
use crate::types::{Money, Rate};

/// How much of one band was used and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandBreakdown {
    pub band_name: String,
    #[serde(serialize_with = "serialize::rate")]
    pub rate: Rate,
    #[serde(serialize_with = "serialize::money")]
    pub from_amount: Money,
    #[serde(serialize_with = "serialize::optional_money")]
    pub to_amount: Option<Money>,
    #[serde(serialize_with = "serialize::money")]
    pub taxable_amount: Money,
    #[serde(serialize_with = "serialize::money")]
    pub amount: Money,
}

/// Slice `income` across `bands`, one row per band including empty ones.
/// Returns the total due and the per-band rows.
pub fn apply_bands(income: Money, bands: &[TaxBand]) -> (Money, Vec<BandBreakdown>) {
    let mut total = Decimal::ZERO;
    let rows = bands
        .iter()
        .map(|band| {
            let ceiling = match band.to {
                Some(to) => income.min(to),
                None => income,
            };
            let taxable_amount = (ceiling - band.from).max(Decimal::ZERO);
            let amount = taxable_amount * band.rate;
            total += amount;
            BandBreakdown {
                band_name: band.name.clone(),
                rate: band.rate,
                from_amount: band.from,
                to_amount: band.to,
                taxable_amount,
                amount,
            }
        })
        .collect();
    (total, rows)
}

/// Personal allowance after the linear taper above `taper_start`, floored at zero.
pub fn tapered_allowance(adjusted_income: Money, cfg: &TaxYearConfig) -> Money {
    let start = cfg.personal_allowance_taper_start;
    if adjusted_income <= start {
        return cfg.personal_allowance;
    }
    let span = cfg.personal_allowance_taper_end - start;
    if span <= Decimal::ZERO || adjusted_income >= cfg.personal_allowance_taper_end {
        return Decimal::ZERO;
    }
    let excess = adjusted_income - start;
    let reduction = cfg
        .personal_allowance
        .checked_mul(excess)
        .map(|scaled| scaled / span)
        .unwrap_or_else(|| cfg.personal_allowance * (excess / span));
    (cfg.personal_allowance - reduction).max(Decimal::ZERO)
}

/// Employee NI bands: main rate between the primary threshold and the upper
/// earnings limit, upper rate above it.
pub fn ni_bands(thresholds: &NiThresholds, rates: &NiCategoryRates) -> [TaxBand; 2] {
    [
        TaxBand {
            name: "main".into(),
            from: thresholds.pt,
            to: Some(thresholds.uel),
            rate: rates.main_rate,
        },
        TaxBand {
            name: "upper".into(),
            from: thresholds.uel,
            to: None,
            rate: rates.upper_rate,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxConfig;
    use rust_decimal_macros::dec;

    fn year() -> TaxYearConfig {
        TaxConfig::embedded().unwrap().tax_year("2024-25").unwrap().clone()
    }

    // ---------------------------------------------------------------
    // 1. Band slicing
    // ---------------------------------------------------------------
    #[test]
    fn test_basic_rate_only() {
        let cfg = year();
        let (tax, rows) = apply_bands(dec!(37430), cfg.bands("england_wales_ni").unwrap());
        assert_eq!(tax, dec!(7486));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].taxable_amount, dec!(37430));
        assert_eq!(rows[1].taxable_amount, Decimal::ZERO);
        assert_eq!(rows[2].to_amount, None);
    }

    #[test]
    fn test_open_top_band() {
        let cfg = year();
        let (tax, rows) = apply_bands(dec!(200000), cfg.bands("england_wales_ni").unwrap());
        // 37700*.2 + 87440*.4 + 74860*.45
        assert_eq!(rows[2].taxable_amount, dec!(74860));
        assert_eq!(tax, dec!(7540) + dec!(34976) + dec!(33687));
    }

    // ---------------------------------------------------------------
    // 2. Allowance taper
    // ---------------------------------------------------------------
    #[test]
    fn test_allowance_taper() {
        let cfg = year();
        assert_eq!(tapered_allowance(dec!(100000), &cfg), dec!(12570));
        assert_eq!(tapered_allowance(dec!(120000), &cfg), dec!(2570));
        assert_eq!(tapered_allowance(dec!(125140), &cfg), Decimal::ZERO);
        assert_eq!(tapered_allowance(dec!(300000), &cfg), Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 3. NI bands
    // ---------------------------------------------------------------
    #[test]
    fn test_ni_main_and_upper() {
        let cfg = year();
        let bands = ni_bands(&cfg.ni.thresholds, cfg.ni.category("A").unwrap());
        let (ni, rows) = apply_bands(dec!(120000), &bands);
        assert_eq!(rows[0].amount, dec!(3016));
        assert_eq!(rows[1].amount, dec!(1394.6));
        assert_eq!(ni, dec!(4410.6));
    }

    #[test]
    fn test_ni_below_primary_threshold() {
        let cfg = year();
        let bands = ni_bands(&cfg.ni.thresholds, cfg.ni.category("A").unwrap());
        let (ni, _) = apply_bands(dec!(12000), &bands);
        assert_eq!(ni, Decimal::ZERO);
    }
}
