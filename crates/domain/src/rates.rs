//! Store-wide rate configuration and cost computation.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A named exception to the default shipping charge, keyed by
/// destination state/region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRate {
    /// Region name. Matching is case-insensitive and exact.
    pub region: String,

    /// Shipping charge for this region.
    pub charge: Money,
}

/// Store-wide rate configuration, maintained by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Tax rate as a percentage of the item subtotal.
    pub tax_percent: f64,

    /// Shipping charge for regions without an override.
    pub default_shipping: Money,

    /// Per-region shipping overrides.
    pub overrides: Vec<RegionRate>,
}

impl RateConfig {
    /// Looks up the shipping charge for a destination region.
    ///
    /// Region matching is trimmed, case-insensitive, exact-match only;
    /// no partial or geographic matching.
    pub fn shipping_for(&self, region: Option<&str>) -> Money {
        let Some(region) = region else {
            return self.default_shipping;
        };
        let wanted = region.trim();

        self.overrides
            .iter()
            .find(|o| o.region.trim().eq_ignore_ascii_case(wanted))
            .map(|o| o.charge)
            .unwrap_or(self.default_shipping)
    }
}

/// Cost breakdown for a quote or a committed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Item subtotal.
    pub items: Money,

    /// Tax on the subtotal, rounded to the nearest paisa.
    pub tax: Money,

    /// Shipping charge for the destination region.
    pub shipping: Money,

    /// items + tax + shipping.
    pub total: Money,
}

/// Computes the cost breakdown for a subtotal and destination region.
///
/// Deterministic and pure: called once to quote and once more at
/// commit time, both calls agree unless the configuration changed in
/// between. An absent configuration fails open with zero tax and zero
/// shipping rather than blocking checkout.
pub fn compute_costs(
    subtotal: Money,
    region: Option<&str>,
    config: Option<&RateConfig>,
) -> CostBreakdown {
    let (tax, shipping) = match config {
        Some(config) => (subtotal.percent(config.tax_percent), config.shipping_for(region)),
        None => (Money::zero(), Money::zero()),
    };

    CostBreakdown {
        items: subtotal,
        tax,
        shipping,
        total: subtotal + tax + shipping,
    }
}
