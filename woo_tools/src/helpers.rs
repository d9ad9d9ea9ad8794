use prg_common::Cents;

use crate::CatalogApiError;

/// The catalog API expresses prices as decimal numbers in strings. Anything beyond two decimal places is truncated.
pub fn parse_price(price: &str) -> Result<Cents, CatalogApiError> {
    let price = price.trim();
    if price.is_empty() {
        return Err(CatalogApiError::InvalidCurrencyAmount(price.to_string()));
    }
    let (whole, frac) = price.split_once('.').unwrap_or((price, ""));
    let whole_units = whole
        .parse::<i64>()
        .map_err(|e| CatalogApiError::InvalidCurrencyAmount(format!("Invalid price value: {price}. {e}.")))?;
    // Truncate on character boundaries; the fraction is not guaranteed to be ASCII.
    let frac = frac.char_indices().nth(2).map_or(frac, |(i, _)| &frac[..i]);
    let cents = match frac.len() {
        0 => 0,
        n => {
            let cents = frac
                .parse::<i64>()
                .map_err(|e| CatalogApiError::InvalidCurrencyAmount(format!("Invalid price value: {price}. {e}.")))?;
            if n == 1 {
                cents * 10
            } else {
                cents
            }
        },
    };
    let sign = if whole.starts_with('-') { -1 } else { 1 };
    whole_units
        .checked_mul(100)
        .and_then(|units| units.checked_add(sign * cents))
        .map(Cents::from)
        .ok_or_else(|| CatalogApiError::InvalidCurrencyAmount(format!("Price value out of range: {price}")))
}
