use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde_json::{Map, Value};

use super::tables::PricingTable;
use crate::catalog;
use crate::error::PricingError;
use crate::model::RawRow;

// Cells carry either "$31.464 USD ($3.933 USD)" (instance rate plus
// per-accelerator rate) or just "$7.865 USD".
static DUAL_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?([\d,]+\.?\d*)\s*USD\s*\(\$?([\d,]+\.?\d*)\s*USD\)").unwrap()
});
static SINGLE_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?([\d,]+\.?\d*)\s*USD").unwrap());

// Recognized Capacity Block token shapes: UltraServer ids plus the
// p6-/p5-/p4-/trn-family sizes.
static INSTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:u-p6e-gb200x\d+|(?:p6-b\d{3}|p5(?:en|e)?|p4de?|trn[12])\.\d+xlarge)$").unwrap()
});

/// Parse one located table into a lazy stream of rows. Finite, consumed
/// once; the first error aborts the run at the consumer.
pub fn parse_table(table: PricingTable) -> impl Iterator<Item = Result<RawRow, PricingError>> {
    let PricingTable {
        row_labels, items, ..
    } = table;
    items
        .into_iter()
        .map(move |item| parse_item(&row_labels, &item))
}

fn parse_item(
    row_labels: &HashMap<String, String>,
    item: &Map<String, Value>,
) -> Result<RawRow, PricingError> {
    let row_id = item
        .get("idProperty")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    let instance_type = match row_labels.get(row_id) {
        Some(label) => clean_cell(label),
        None => {
            return Err(PricingError::UnknownInstanceType {
                token: row_id.to_string(),
            })
        }
    };
    if !INSTANCE_RE.is_match(&instance_type) {
        return Err(PricingError::UnknownInstanceType {
            token: instance_type,
        });
    }

    let region_label = clean_cell(cell_text(item, "2"));
    if region_label.is_empty() {
        return Err(PricingError::UnknownRegion {
            instance_type,
            label: region_label,
        });
    }
    let region_code = catalog::region_code(&region_label, &instance_type)?;

    let rate_cell = clean_cell(cell_text(item, "3"));
    let (hourly_rate_usd, accelerator_hourly_rate_usd) = parse_rate(&rate_cell, &instance_type)?;

    Ok(RawRow {
        instance_type,
        region_label,
        region_code: region_code.to_string(),
        hourly_rate_usd,
        accelerator_hourly_rate_usd,
    })
}

fn cell_text<'a>(item: &'a Map<String, Value>, key: &str) -> &'a str {
    item.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

/// Strip markup and unescape entities. Cells arrive as HTML fragments like
/// `<p>US East (N. Virginia)</p>`.
fn clean_cell(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.trim().to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a rate cell into (hourly, per-accelerator) USD figures. Cells
/// without a per-accelerator figure yield 0.0 for it.
fn parse_rate(cell: &str, instance_type: &str) -> Result<(f64, f64), PricingError> {
    let rate_err = || PricingError::RateParse {
        instance_type: instance_type.to_string(),
        cell: cell.to_string(),
    };

    if let Some(caps) = DUAL_RATE_RE.captures(cell) {
        let hourly = parse_number(&caps[1]).ok_or_else(rate_err)?;
        let per_accel = parse_number(&caps[2]).ok_or_else(rate_err)?;
        return Ok((hourly, per_accel));
    }

    if let Some(caps) = SINGLE_RATE_RE.captures(cell) {
        let hourly = parse_number(&caps[1]).ok_or_else(rate_err)?;
        return Ok((hourly, 0.0));
    }

    Err(rate_err())
}

fn parse_number(digits: &str) -> Option<f64> {
    digits
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}
