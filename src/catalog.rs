use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::PricingError;
use crate::model::InstanceMetadata;

/// Capacity Block instance types and their accelerator classification.
/// The page never states this per row (it is implicit in table grouping),
/// so this table is the single source of truth.
static INSTANCE_CATALOG: LazyLock<HashMap<&'static str, InstanceMetadata>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    let mut add = |ty, family, accel, count| {
        m.insert(
            ty,
            InstanceMetadata {
                instance_family: family,
                accelerator_type: accel,
                accelerator_count: count,
            },
        );
    };

    // P6e UltraServers
    add("u-p6e-gb200x72", "P6e", "GB200", 72);
    add("u-p6e-gb200x36", "P6e", "GB200", 36);
    // P6
    add("p6-b300.48xlarge", "P6-B300", "B300", 8);
    add("p6-b200.48xlarge", "P6-B200", "B200", 8);
    // P5 generation
    add("p5en.48xlarge", "P5en", "H200", 8);
    add("p5e.48xlarge", "P5e", "H200", 8);
    add("p5.48xlarge", "P5", "H100", 8);
    add("p5.4xlarge", "P5", "H100", 1);
    // P4 generation
    add("p4de.24xlarge", "P4de", "A100", 8);
    add("p4d.24xlarge", "P4d", "A100", 8);
    // Trainium
    add("trn2.48xlarge", "Trn2", "Trainium2", 16);
    add("trn2.3xlarge", "Trn2", "Trainium2", 1);
    add("trn1.32xlarge", "Trn1", "Trainium", 16);

    m
});

/// Human-readable region labels as they appear on the page, mapped to
/// canonical codes. Includes the alternate spellings and Local Zone labels
/// AWS has used across page revisions.
static REGION_NAME_TO_CODE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("US East (N. Virginia)", "us-east-1"),
        ("US East (Ohio)", "us-east-2"),
        ("US West (N. California)", "us-west-1"),
        ("US West (Oregon)", "us-west-2"),
        ("Africa (Cape Town)", "af-south-1"),
        ("Asia Pacific (Hong Kong)", "ap-east-1"),
        ("Asia Pacific (Hyderabad)", "ap-south-2"),
        ("Asia Pacific (Jakarta)", "ap-southeast-3"),
        ("Asia Pacific (Melbourne)", "ap-southeast-4"),
        ("Asia Pacific (Mumbai)", "ap-south-1"),
        ("Asia Pacific (Osaka)", "ap-northeast-3"),
        ("Asia Pacific (Seoul)", "ap-northeast-2"),
        ("Asia Pacific (Singapore)", "ap-southeast-1"),
        ("Asia Pacific (Sydney)", "ap-southeast-2"),
        ("Asia Pacific (Tokyo)", "ap-northeast-1"),
        ("Canada (Central)", "ca-central-1"),
        ("Canada West (Calgary)", "ca-west-1"),
        ("Europe (Frankfurt)", "eu-central-1"),
        ("Europe (Ireland)", "eu-west-1"),
        ("Europe (London)", "eu-west-2"),
        ("Europe (Milan)", "eu-south-1"),
        ("Europe (Paris)", "eu-west-3"),
        ("Europe (Spain)", "eu-south-2"),
        ("Europe (Stockholm)", "eu-north-1"),
        ("Europe (Zurich)", "eu-central-2"),
        ("Israel (Tel Aviv)", "il-central-1"),
        ("Middle East (Bahrain)", "me-south-1"),
        ("Middle East (UAE)", "me-central-1"),
        ("South America (São Paulo)", "sa-east-1"),
        ("South America (Sao Paulo)", "sa-east-1"),
        // Alternate naming the page has used
        ("Australia (Sydney)", "ap-southeast-2"),
        ("Australia (Melbourne)", "ap-southeast-4"),
        // Local Zones
        ("US West (Dallas Local Zone)", "us-west-2-dal-1a"),
        ("Dallas Local Zone\n(US East N. Virginia)", "us-east-1-dfw-2a"),
    ])
});

/// Resolve an instance type to its family/accelerator metadata.
pub fn lookup(instance_type: &str) -> Result<&'static InstanceMetadata, PricingError> {
    INSTANCE_CATALOG
        .get(instance_type)
        .ok_or_else(|| PricingError::UnknownInstanceType {
            token: instance_type.to_string(),
        })
}

/// Resolve a human-readable region label to its canonical code. Unknown
/// labels are an error, never a guess.
pub fn region_code(label: &str, instance_type: &str) -> Result<&'static str, PricingError> {
    REGION_NAME_TO_CODE
        .get(label)
        .or_else(|| REGION_NAME_TO_CODE.get(label.trim()))
        .copied()
        .ok_or_else(|| PricingError::UnknownRegion {
            instance_type: instance_type.to_string(),
            label: label.to_string(),
        })
}
