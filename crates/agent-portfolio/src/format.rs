//! Number rendering for spoken answers

/// Render a stored number the way it reads in the data: `9` not `9.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Optional number, `N/A` when absent
pub fn number_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), format_number)
}

/// Optional text, `N/A` when absent
pub fn text_or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// Divisors tried from largest to smallest, amounts stored in millions
const MONEY_TIERS: [(f64, &str); 2] = [(1000.0, "billion"), (1.0, "million")];

/// Unit-adaptive amount: the largest tier whose quotient is at least 0.1
///
/// Amounts are stored in millions; `1500` reads "$1.5 billion" and `50`
/// reads "$50.0 million".
pub fn format_money_adaptive(millions: f64) -> String {
    for (divisor, unit) in MONEY_TIERS {
        let scaled = millions / divisor;
        if scaled >= 0.1 {
            return format!("${scaled:.1} {unit}");
        }
    }
    format!("${millions:.1} million")
}

/// Valuation in billions with one decimal, e.g. "$1.5 billion"
pub fn format_billions(millions: f64) -> String {
    format!("${:.1} billion", millions / 1000.0)
}
