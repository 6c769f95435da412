//! CLI subcommands

mod quantify;
mod valuate;

pub use quantify::QuantifyCommand;
pub use valuate::ValuateCommand;

use rust_decimal::Decimal;

/// Currency amount with thousands grouping, e.g. `$1,234.56`
pub(crate) fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac)
}
