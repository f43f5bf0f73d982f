use crate::storage::{PRICE_GROWTH_DENOMINATOR, PRICE_GROWTH_NUMERATOR};

/// Price of the next mint given the price paid by the previous one
///
/// Formula: next = max(price × 10011 / 10000, price + 1)
///
/// Geometric growth of 0.11% per mint. The `+ 1` floor keeps the curve
/// strictly increasing when the price is too small for the percentage
/// step to survive integer division.
///
/// Example:
/// - price: 10,000,000 (1.0 at 7 decimals)
/// - next: 10,011,000
pub fn next_price(price: i128) -> Option<i128> {
    let grown = price
        .checked_mul(PRICE_GROWTH_NUMERATOR)?
        .checked_div(PRICE_GROWTH_DENOMINATOR)?;
    let floor = price.checked_add(1)?;

    Some(grown.max(floor))
}

/// Excess returned to the minter; `None` if the payment is short
pub fn refund_due(payment: i128, price: i128) -> Option<i128> {
    payment.checked_sub(price).filter(|refund| *refund >= 0)
}

/// Half of the retained balance, rounded down
pub fn payout_share(balance: i128) -> i128 {
    balance / 2
}

/// Seconds left until `deadline`, zero once it has passed
pub fn seconds_until(now: u64, deadline: u64) -> u64 {
    deadline.saturating_sub(now)
}
