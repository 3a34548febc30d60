use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::info;

use crate::catalog;
use crate::error::PricingError;
use crate::model::{InstanceTypeRecord, Metadata, PricingDocument, RawRow, RegionEntry};

/// Schema version of the emitted artifact.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Consume the full row stream and assemble the output document.
///
/// Instance types are keyed in first-appearance order, and each `pricing`
/// list keeps the order regions appear in on the page; consumers diff the
/// artifact against the page's presentation order. The first bad row aborts
/// the run; there is no partial document.
pub fn build_document(
    rows: impl IntoIterator<Item = Result<RawRow, PricingError>>,
    source_url: &str,
    fetched_at: DateTime<Utc>,
) -> Result<PricingDocument, PricingError> {
    let mut instance_types: IndexMap<String, InstanceTypeRecord> = IndexMap::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for row in rows {
        let row = row?;
        let meta = catalog::lookup(&row.instance_type)?;

        let key = (row.instance_type.clone(), row.region_code.clone());
        if !seen.insert(key) {
            return Err(PricingError::DuplicateRegion {
                instance_type: row.instance_type,
                region_code: row.region_code,
            });
        }

        let record = instance_types
            .entry(row.instance_type)
            .or_insert_with(|| InstanceTypeRecord {
                instance_family: meta.instance_family.to_string(),
                accelerator_type: meta.accelerator_type.to_string(),
                accelerator_count: meta.accelerator_count,
                pricing: Vec::new(),
            });

        record.pricing.push(RegionEntry {
            region: row.region_label,
            region_code: row.region_code,
            hourly_rate_usd: row.hourly_rate_usd,
            accelerator_hourly_rate_usd: row.accelerator_hourly_rate_usd,
        });
    }

    if instance_types.is_empty() {
        return Err(PricingError::SchemaDrift(
            "pricing tables yielded zero rows".to_string(),
        ));
    }

    let document = PricingDocument {
        metadata: Metadata {
            last_updated: fetched_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            source_url: source_url.to_string(),
            version: SCHEMA_VERSION.to_string(),
        },
        instance_types,
    };

    info!(
        "Normalized {} instance types, {} pricing entries",
        document.instance_types.len(),
        document.entry_count()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const URL: &str = "https://aws.amazon.com/ec2/capacityblocks/pricing/";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn row(instance_type: &str, region: &str, code: &str, hourly: f64, accel: f64) -> RawRow {
        RawRow {
            instance_type: instance_type.to_string(),
            region_label: region.to_string(),
            region_code: code.to_string(),
            hourly_rate_usd: hourly,
            accelerator_hourly_rate_usd: accel,
        }
    }

    #[test]
    fn groups_by_instance_type_in_arrival_order() {
        let rows = vec![
            Ok(row("p5.48xlarge", "US East (N. Virginia)", "us-east-1", 31.464, 3.933)),
            Ok(row("trn1.32xlarge", "US East (N. Virginia)", "us-east-1", 13.468, 0.842)),
            Ok(row("p5.48xlarge", "US West (Oregon)", "us-west-2", 31.464, 3.933)),
        ];
        let doc = build_document(rows, URL, at()).unwrap();

        let keys: Vec<&String> = doc.instance_types.keys().collect();
        assert_eq!(keys, ["p5.48xlarge", "trn1.32xlarge"]);

        let p5 = &doc.instance_types["p5.48xlarge"];
        assert_eq!(p5.instance_family, "P5");
        assert_eq!(p5.accelerator_type, "H100");
        assert_eq!(p5.accelerator_count, 8);
        let codes: Vec<&str> = p5.pricing.iter().map(|e| e.region_code.as_str()).collect();
        assert_eq!(codes, ["us-east-1", "us-west-2"]);
    }

    #[test]
    fn metadata_block() {
        let rows = vec![Ok(row("p4d.24xlarge", "US East (Ohio)", "us-east-2", 24.0, 3.0))];
        let doc = build_document(rows, URL, at()).unwrap();
        assert_eq!(doc.metadata.last_updated, "2025-06-01T12:00:00Z");
        assert_eq!(doc.metadata.source_url, URL);
        assert_eq!(doc.metadata.version, SCHEMA_VERSION);
    }

    #[test]
    fn duplicate_region_rejected() {
        let rows = vec![
            Ok(row("p5.48xlarge", "US East (N. Virginia)", "us-east-1", 31.464, 3.933)),
            Ok(row("p5.48xlarge", "US East (N. Virginia)", "us-east-1", 31.464, 3.933)),
        ];
        let err = build_document(rows, URL, at()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::DuplicateRegion { instance_type, region_code }
                if instance_type == "p5.48xlarge" && region_code == "us-east-1"
        ));
    }

    #[test]
    fn same_region_different_types_allowed() {
        let rows = vec![
            Ok(row("p5.48xlarge", "US East (N. Virginia)", "us-east-1", 31.464, 3.933)),
            Ok(row("p5e.48xlarge", "US East (N. Virginia)", "us-east-1", 34.608, 4.326)),
        ];
        let doc = build_document(rows, URL, at()).unwrap();
        assert_eq!(doc.instance_types.len(), 2);
    }

    #[test]
    fn uncataloged_instance_type_rejected() {
        let rows = vec![Ok(row("m5.large", "US East (N. Virginia)", "us-east-1", 0.096, 0.0))];
        let err = build_document(rows, URL, at()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownInstanceType { token } if token == "m5.large"
        ));
    }

    #[test]
    fn empty_stream_is_schema_drift() {
        let err = build_document(Vec::new(), URL, at()).unwrap_err();
        assert!(matches!(err, PricingError::SchemaDrift(_)));
    }

    #[test]
    fn row_error_propagates() {
        let rows = vec![
            Ok(row("p5.48xlarge", "US East (N. Virginia)", "us-east-1", 31.464, 3.933)),
            Err(PricingError::RateParse {
                instance_type: "p5.4xlarge".to_string(),
                cell: "N/A".to_string(),
            }),
        ];
        let err = build_document(rows, URL, at()).unwrap_err();
        assert!(matches!(err, PricingError::RateParse { .. }));
    }
}
