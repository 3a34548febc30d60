use std::collections::HashMap;

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::PricingError;

/// One pricing table lifted out of the page, still in the page's own JSON
/// vocabulary: row ids mapped to instance-type labels, and the raw cell
/// objects. The row parser turns these into typed rows.
#[derive(Debug, Clone)]
pub struct PricingTable {
    pub heading: String,
    pub row_labels: HashMap<String, String>,
    pub items: Vec<Map<String, Value>>,
}

/// Locate every pricing table embedded in the page.
///
/// The page does not render its tables as HTML `<table>` markup. Each table
/// component ships its data inside a `<script type="application/json">`
/// element shaped:
///
/// ```text
/// { "data": { "items": [ { "fields": { "jsonData": "<escaped JSON>" } } ] } }
/// ```
///
/// where the inner JSON carries `heading`, `table.rowDefinitions`
/// (`{id, label}` pairs naming instance types) and `table.items` (cell
/// objects keyed by column index, with `idProperty` pointing back at a row
/// definition). Script payloads that fail to decode, or whose heading does
/// not mention "Pricing", belong to other page components and are skipped.
pub fn locate_tables(html: &str) -> Result<Vec<PricingTable>, PricingError> {
    let document = Html::parse_document(html);
    let script_selector =
        Selector::parse(r#"script[type="application/json"]"#).expect("Invalid script selector");

    let mut tables = Vec::new();
    let mut scanned = 0usize;

    for script in document.select(&script_selector) {
        scanned += 1;
        let raw: String = script.text().collect();

        let Ok(outer) = serde_json::from_str::<Value>(&raw) else {
            debug!("Skipping script payload that is not valid JSON");
            continue;
        };

        let items = outer
            .get("data")
            .and_then(|d| d.get("items"))
            .and_then(|i| i.as_array());
        let Some(items) = items else { continue };

        for item in items {
            let Some(json_data) = item
                .get("fields")
                .and_then(|f| f.get("jsonData"))
                .and_then(|j| j.as_str())
            else {
                continue;
            };

            let Ok(inner) = serde_json::from_str::<Value>(json_data) else {
                debug!("Skipping jsonData payload that is not valid JSON");
                continue;
            };

            let heading = inner
                .get("heading")
                .and_then(|h| h.as_str())
                .unwrap_or_default();
            if !heading.contains("Pricing") {
                continue;
            }

            if let Some(table) = build_table(heading, &inner) {
                debug!("Located pricing table: {}", table.heading);
                tables.push(table);
            }
        }
    }

    if tables.is_empty() {
        return Err(PricingError::SchemaDrift(format!(
            "no pricing tables found ({} JSON script payloads scanned)",
            scanned
        )));
    }

    info!("Located {} pricing tables", tables.len());
    Ok(tables)
}

fn build_table(heading: &str, inner: &Value) -> Option<PricingTable> {
    let table = inner.get("table")?;

    let row_labels: HashMap<String, String> = table
        .get("rowDefinitions")
        .and_then(|r| r.as_array())
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let id = row.get("id")?.as_str()?.to_string();
                    let label = row.get("label").and_then(|l| l.as_str()).unwrap_or_default();
                    Some((id, label.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let items: Vec<Map<String, Value>> = table
        .get("items")
        .and_then(|i| i.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_object().cloned())
                .collect()
        })
        .unwrap_or_default();

    Some(PricingTable {
        heading: heading.to_string(),
        row_labels,
        items,
    })
}
