use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Monetary value in the smallest currency unit.
///
/// Signed so that ledger entries can carry debits as negative deltas.
pub type Money = i64;

/// Computes the commission for `amount` at `rate`, rounded down to a whole unit.
///
/// The multiplication is done in `Decimal` so that rates like `0.01` are exact.
pub fn commission(amount: Money, rate: Decimal) -> Money {
    (Decimal::from(amount) * rate)
        .floor()
        .to_i64()
        .unwrap_or(Money::MAX)
}

/// Renders an amount with `,` thousands separators, e.g. `1,250,000`.
pub fn format_money(amount: Money) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
