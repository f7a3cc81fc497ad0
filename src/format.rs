//! Display helpers for listing cards and the detail view.

use chrono::{Datelike, NaiveDate};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Colombian peso display: `$ 450.000.000`
pub fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if price < 0 {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

pub fn format_address(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len).collect();
    format!("{}...", head.trim_end())
}

/// Spanish long date: `25 de diciembre de 2023`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(450_000_000), "$ 450.000.000");
        assert_eq!(format_price(1_500_000), "$ 1.500.000");
        assert_eq!(format_price(999), "$ 999");
        assert_eq!(format_price(0), "$ 0");
        assert_eq!(format_price(-100_000), "-$ 100.000");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address("  Carrera 7  #15-20   "), "Carrera 7 #15-20");
        assert_eq!(format_address("Avenida   19    #100-50"), "Avenida 19 #100-50");
        assert_eq!(format_address("   "), "");
    }

    #[test]
    fn test_truncate_text() {
        let long = "This is a very long text that should be truncated";
        assert_eq!(truncate_text(long, 20), "This is a very long...");
        assert_eq!(truncate_text("Short text", 20), "Short text");
        assert_eq!(truncate_text("Exactly twenty chars", 20), "Exactly twenty chars");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(format_date(date), "25 de diciembre de 2023");
    }
}
