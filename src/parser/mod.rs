pub mod rows;
pub mod tables;

use crate::error::PricingError;
use crate::model::RawRow;

/// Locate every pricing table in the fetched page and return the lazy row
/// stream across all of them, in page order.
pub fn parse_page(
    html: &str,
) -> Result<impl Iterator<Item = Result<RawRow, PricingError>>, PricingError> {
    let tables = tables::locate_tables(html)?;
    Ok(tables.into_iter().flat_map(rows::parse_table))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{build_document, SCHEMA_VERSION};
    use chrono::{TimeZone, Utc};

    const URL: &str = "https://aws.amazon.com/ec2/capacityblocks/pricing/";

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/pricing_page.html").unwrap()
    }

    fn parse_fixture() -> crate::model::PricingDocument {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        build_document(parse_page(&fixture()).unwrap(), URL, at).unwrap()
    }

    #[test]
    fn fixture_end_to_end() {
        let doc = parse_fixture();

        let p5 = &doc.instance_types["p5.48xlarge"];
        assert_eq!(p5.instance_family, "P5");
        assert_eq!(p5.accelerator_type, "H100");
        assert_eq!(p5.accelerator_count, 8);
        assert_eq!(p5.pricing[0].region, "US East (N. Virginia)");
        assert_eq!(p5.pricing[0].region_code, "us-east-1");
        assert_eq!(p5.pricing[0].hourly_rate_usd, 31.464);
        assert_eq!(p5.pricing[0].accelerator_hourly_rate_usd, 3.933);

        assert_eq!(doc.metadata.source_url, URL);
        assert_eq!(doc.metadata.version, SCHEMA_VERSION);
        assert_eq!(doc.metadata.last_updated, "2025-06-01T12:00:00Z");
    }

    #[test]
    fn fixture_keys_match_parsed_rows() {
        let doc = parse_fixture();
        let keys: Vec<&String> = doc.instance_types.keys().collect();
        assert_eq!(
            keys,
            [
                "p5.48xlarge",
                "p5.4xlarge",
                "trn1.32xlarge",
                "trn2.48xlarge",
                "u-p6e-gb200x72",
            ]
        );
        // Every key resolves in the catalog.
        for key in keys {
            crate::catalog::lookup(key).unwrap();
        }
    }

    #[test]
    fn fixture_region_order_follows_page() {
        let doc = parse_fixture();
        let codes: Vec<&str> = doc.instance_types["p5.48xlarge"]
            .pricing
            .iter()
            .map(|e| e.region_code.as_str())
            .collect();
        assert_eq!(codes, ["us-east-1", "us-west-2"]);
    }

    #[test]
    fn fixture_region_alias_resolved() {
        let doc = parse_fixture();
        let trn1 = &doc.instance_types["trn1.32xlarge"];
        assert_eq!(trn1.pricing[0].region, "Australia (Sydney)");
        assert_eq!(trn1.pricing[0].region_code, "ap-southeast-2");
    }

    #[test]
    fn fixture_thousands_separator_rate() {
        let doc = parse_fixture();
        let ultra = &doc.instance_types["u-p6e-gb200x72"];
        assert_eq!(ultra.accelerator_count, 72);
        assert_eq!(ultra.pricing[0].hourly_rate_usd, 1156.149);
        assert_eq!(ultra.pricing[0].accelerator_hourly_rate_usd, 16.058);
    }

    #[test]
    fn idempotent_modulo_timestamp() {
        let a = parse_fixture();
        let b = parse_fixture();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string_pretty(&a).unwrap(),
            serde_json::to_string_pretty(&b).unwrap()
        );
    }

    #[test]
    fn artifact_round_trip() {
        let doc = parse_fixture();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: crate::model::PricingDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn artifact_field_order() {
        let doc = parse_fixture();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let metadata = json.find("\"metadata\"").unwrap();
        let types = json.find("\"instance_types\"").unwrap();
        assert!(metadata < types);
        // Region entry fields in the documented order.
        let region = json.find("\"region\"").unwrap();
        let code = json.find("\"region_code\"").unwrap();
        let hourly = json.find("\"hourly_rate_usd\"").unwrap();
        assert!(region < code && code < hourly);
    }
}
