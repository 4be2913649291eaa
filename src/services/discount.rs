//! Discount arithmetic and the `DISCOUNT:<fraction>` directive carried in a
//! product update's `transientField`.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::debug;

use crate::errors::ServiceError;

/// Keyword of the update directive, matched ignoring ASCII case
pub const DISCOUNT_KEYWORD: &str = "DISCOUNT";

/// Fewest fractional digits a discounted price is rounded to
const MIN_PRICE_SCALE: u32 = 2;

/// Extracts the fraction from a `DISCOUNT:<fraction>` directive.
///
/// Anything that does not look like a directive yields `None`. The fraction is
/// not range-checked here; [`discounted_price`] does that.
pub fn parse_directive(raw: &str) -> Option<Decimal> {
    let Some((keyword, fraction)) = raw.split_once(':') else {
        debug!(directive = %raw, "Ignoring directive without a separator");
        return None;
    };

    if !keyword.trim().eq_ignore_ascii_case(DISCOUNT_KEYWORD) {
        debug!(directive = %raw, "Ignoring directive with unknown keyword");
        return None;
    }

    match Decimal::from_str(fraction.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(directive = %raw, error = %e, "Ignoring directive with non-numeric fraction");
            None
        }
    }
}

/// Computes `price - price * fraction` for a fraction in `[0, 1]`.
///
/// The result is rounded half away from zero to the larger of the price's own
/// scale and two digits.
pub fn discounted_price(price: Decimal, fraction: Decimal) -> Result<Decimal, ServiceError> {
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(ServiceError::InvalidArgument(format!(
            "Discount must be between 0 and 1, got {}",
            fraction
        )));
    }

    let scale = price.scale().max(MIN_PRICE_SCALE);
    let raw = price
        .checked_sub(price.checked_mul(fraction).ok_or_else(overflow)?)
        .ok_or_else(overflow)?;

    let mut rounded = raw.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    Ok(rounded)
}

fn overflow() -> ServiceError {
    ServiceError::InvalidArgument("Discounted price is out of range".to_string())
}
