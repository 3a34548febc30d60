use thiserror::Error;

/// Everything that can go wrong between fetching the page and writing the
/// artifact. Every variant names the offending input so a failed run is
/// diagnosable from the message alone.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Expected page structure is absent. Zero pricing tables (or zero
    /// extracted records) is drift, never valid "no data".
    #[error("source page structure changed: {0}")]
    SchemaDrift(String),

    #[error("unparseable rate {cell:?} for {instance_type}")]
    RateParse { instance_type: String, cell: String },

    #[error("unknown region label {label:?} for {instance_type}")]
    UnknownRegion {
        instance_type: String,
        label: String,
    },

    #[error("unknown instance type {token:?}")]
    UnknownInstanceType { token: String },

    #[error("duplicate pricing row for {instance_type} in {region_code}")]
    DuplicateRegion {
        instance_type: String,
        region_code: String,
    },
}
