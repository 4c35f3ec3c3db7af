//! Structured catalog records.

use serde::{Deserialize, Serialize};

/// One row of `shops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRow {
    pub id: i64,
    pub name: String,
}

/// One row of `products`, as returned by product listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    /// Absent when the row was written without a price.
    pub price: Option<f64>,
    pub bought: bool,
    /// Empty descriptions written through the store are stored as NULL.
    pub description: Option<String>,
}

/// Input for inserting a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub shop_id: i64,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new(shop_id: i64, name: impl Into<String>, price: f64) -> Self {
        Self {
            shop_id,
            name: name.into(),
            price,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full-row replacement of a product's mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub bought: bool,
    pub description: Option<String>,
}

/// Maps an empty description to NULL.
pub(crate) fn normalize_description(description: Option<&str>) -> Option<&str> {
    description.filter(|d| !d.is_empty())
}

impl ShopRow {
    /// `"id:name"`, the delimiter-joined form of the native bridge.
    pub fn to_legacy_string(&self) -> String {
        format!("{}:{}", self.id, self.name)
    }
}

impl ProductRow {
    /// `"id:name:price:bought:description"`, NULL columns rendered empty.
    pub fn to_legacy_string(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.id,
            self.name,
            self.price.map(format_real).unwrap_or_default(),
            u8::from(self.bought),
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// Renders a REAL the way SQLite's text conversion does: 15 significant
/// digits, trailing zeros dropped but at least one fractional digit, and
/// exponent form below 1e-4 or from 1e15 upward.
fn format_real(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    // `{:.14e}` yields exactly 15 correctly rounded significant digits.
    let scientific = format!("{:.14e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    if !(-4..15).contains(&exponent) {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        out.push('.');
        out.push_str(if rest.is_empty() { "0" } else { rest });
        out.push_str(&format!(
            "e{}{:02}",
            if exponent < 0 { '-' } else { '+' },
            exponent.unsigned_abs()
        ));
    } else if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() > int_len {
            let (int_part, frac) = digits.split_at(int_len);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac);
        } else {
            out.push_str(digits);
            out.push_str(&"0".repeat(int_len - digits.len()));
            out.push_str(".0");
        }
    } else {
        out.push_str("0.");
        out.push_str(&"0".repeat(exponent.unsigned_abs() as usize - 1));
        out.push_str(digits);
    }
    out
}
