//! Readers for free-text generative answers.
//!
//! Both parsers are deliberately simple. A structured output format would be
//! the place to harden them.

use regex::Regex;
use std::sync::LazyLock;

static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.?\d[\d.]*").expect("price pattern is valid"));

/// First run of digits and decimal points in `text`, read as a number.
///
/// Thousands separators are not understood: `"1,200"` reads as `1`.
pub fn extract_price(text: &str) -> Option<f64> {
    let run = PRICE_PATTERN.find(text)?.as_str().trim_end_matches('.');
    run.parse::<f64>().ok().filter(|price| price.is_finite())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiagnosis {
    pub label: String,
    pub treatment: Vec<String>,
}

/// First line is the diagnosis, every following line one recommendation.
/// Blank lines are skipped.
pub fn parse_diagnosis(text: &str) -> Option<ParsedDiagnosis> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let label = lines.next()?.to_string();

    Some(ParsedDiagnosis {
        label,
        treatment: lines.map(str::to_string).collect(),
    })
}
