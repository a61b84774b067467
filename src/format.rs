//! Display helpers for amounts and rates

/// A currency the planner can display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: usize,
}

pub const SUPPORTED_CURRENCIES: [Currency; 6] = [
    Currency { code: "USD", symbol: "$", name: "US Dollar", decimals: 2 },
    Currency { code: "EUR", symbol: "€", name: "Euro", decimals: 2 },
    Currency { code: "GBP", symbol: "£", name: "British Pound", decimals: 2 },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar", decimals: 2 },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar", decimals: 2 },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen", decimals: 0 },
];

/// Look up a supported currency by ISO code (case-insensitive)
pub fn currency(code: &str) -> Option<&'static Currency> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Format an amount with symbol and thousands separators; unknown codes use USD
pub fn format_currency(amount: f64, code: &str) -> String {
    let currency = currency(code).unwrap_or(&SUPPORTED_CURRENCIES[0]);
    let formatted = format!("{:.*}", currency.decimals, amount.abs());

    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{}{}{}.{}", sign, currency.symbol, grouped, fraction),
        None => format!("{}{}{}", sign, currency.symbol, grouped),
    }
}

/// Format an annual rate as a percentage with two decimals
pub fn format_percentage(rate: f64) -> String {
    format!("{:.2}%", rate)
}
