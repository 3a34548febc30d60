use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One parsed pricing row, straight out of a table. Transient: consumed by
/// the normalizer, never serialized.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub instance_type: String,
    pub region_label: String,
    pub region_code: String,
    pub hourly_rate_usd: f64,
    pub accelerator_hourly_rate_usd: f64,
}

/// Static catalog entry for a recognized instance type.
#[derive(Debug, Clone, Copy)]
pub struct InstanceMetadata {
    pub instance_family: &'static str,
    pub accelerator_type: &'static str,
    pub accelerator_count: u32,
}

/// Published rates for one region, in the order the page lists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub region: String,
    pub region_code: String,
    pub hourly_rate_usd: f64,
    pub accelerator_hourly_rate_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceTypeRecord {
    pub instance_family: String,
    pub accelerator_type: String,
    pub accelerator_count: u32,
    pub pricing: Vec<RegionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub last_updated: String,
    pub source_url: String,
    pub version: String,
}

/// Root of the persisted artifact. `instance_types` is insertion-ordered so
/// repeated runs against identical input produce byte-identical JSON
/// (modulo `last_updated`) and the artifact diffs cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDocument {
    pub metadata: Metadata,
    pub instance_types: IndexMap<String, InstanceTypeRecord>,
}

impl PricingDocument {
    /// Total number of (instance type, region) pricing entries.
    pub fn entry_count(&self) -> usize {
        self.instance_types.values().map(|r| r.pricing.len()).sum()
    }
}
