use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents, half away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `percent`% of `amount`, rounded to cents
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_currency(amount * percent / Decimal::ONE_HUNDRED)
}

/// Dollar amount with two decimals, e.g. `$127.50`
pub fn usd(amount: Decimal) -> String {
    format!("${:.2}", round_currency(amount))
}
