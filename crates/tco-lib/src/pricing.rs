//! Static pricing catalog
//!
//! On-demand USD list prices for us-east-1 plus per-region multipliers.
//! Nothing here is fetched at runtime; operators can override any value by
//! pointing [`PricingCatalog::load`] at a JSON/TOML/YAML file or by setting
//! `TCO_PRICING__*` environment variables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Billing hours in a month
pub const HOURS_PER_MONTH: f64 = 730.0;

/// GB per TB used for tonnage conversion
pub const GB_PER_TB: f64 = 1024.0;

/// Environment prefix for pricing overrides
pub const PRICING_ENV_PREFIX: &str = "TCO_PRICING";

/// EC2 instance shape and hourly rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstancePrice {
    /// API name such as `m5.2xlarge`
    pub name: String,
    pub vcpu: u32,
    /// Memory in GB
    pub memory: u32,
    pub hourly: f64,
}

impl InstancePrice {
    fn new(name: &str, vcpu: u32, memory: u32, hourly: f64) -> Self {
        Self {
            name: name.to_string(),
            vcpu,
            memory,
            hourly,
        }
    }
}

/// One band of tiered internet egress pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EgressTier {
    /// Size of this band in GB; `None` for the open-ended last band
    pub band_gb: Option<f64>,
    pub per_gb: f64,
}

/// Full set of rates used by the calculator and optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingCatalog {
    /// Label recorded in assumptions, e.g. `2024-06 list prices`
    pub version: String,
    /// Kept as a list: instance names contain dots, which config treats as paths
    pub instances: Vec<InstancePrice>,
    pub default_instance: String,
    pub ebs_gp3_per_gb_month: f64,
    pub efs_standard_per_gb_month: f64,
    pub s3_standard_per_gb_month: f64,
    pub eks_cluster_hourly: f64,
    pub direct_connect_port_hourly: f64,
    pub direct_connect_port_gbps: f64,
    pub direct_connect_egress_per_gb: f64,
    pub nat_gateway_hourly: f64,
    pub nat_processing_per_gb: f64,
    pub internet_egress_tiers: Vec<EgressTier>,
    pub outposts_rack_monthly: f64,
    pub outposts_rack_vcpu: u32,
    /// Usable memory per Outposts rack in GB
    pub outposts_rack_memory: u32,
    pub region_multipliers: BTreeMap<String, f64>,
}

impl Default for PricingCatalog {
    fn default() -> Self {
        let instances = vec![
            InstancePrice::new("m5.xlarge", 4, 16, 0.192),
            InstancePrice::new("m5.2xlarge", 8, 32, 0.384),
            InstancePrice::new("m5.4xlarge", 16, 64, 0.768),
            InstancePrice::new("c5.2xlarge", 8, 16, 0.34),
            InstancePrice::new("c5.4xlarge", 16, 32, 0.68),
            InstancePrice::new("c6i.4xlarge", 16, 32, 0.68),
            InstancePrice::new("m6g.2xlarge", 8, 32, 0.308),
            InstancePrice::new("c6gn.4xlarge", 16, 32, 0.6912),
            InstancePrice::new("r5.2xlarge", 8, 64, 0.504),
        ];

        let region_multipliers = [
            ("us-east-1", 1.00),
            ("us-east-2", 1.00),
            ("us-west-2", 1.00),
            ("us-west-1", 1.10),
            ("ca-central-1", 1.05),
            ("eu-west-1", 1.08),
            ("eu-central-1", 1.12),
            ("eu-west-2", 1.10),
            ("ap-southeast-1", 1.15),
            ("ap-northeast-1", 1.20),
            ("ap-south-1", 1.05),
            ("sa-east-1", 1.35),
        ]
        .into_iter()
        .map(|(region, multiplier)| (region.to_string(), multiplier))
        .collect();

        Self {
            version: "builtin-us-east-1".to_string(),
            instances,
            default_instance: "m5.2xlarge".to_string(),
            ebs_gp3_per_gb_month: 0.08,
            efs_standard_per_gb_month: 0.30,
            s3_standard_per_gb_month: 0.023,
            eks_cluster_hourly: 0.10,
            direct_connect_port_hourly: 2.25,
            direct_connect_port_gbps: 10.0,
            direct_connect_egress_per_gb: 0.02,
            nat_gateway_hourly: 0.045,
            nat_processing_per_gb: 0.045,
            internet_egress_tiers: vec![
                EgressTier {
                    band_gb: Some(10.0 * GB_PER_TB),
                    per_gb: 0.09,
                },
                EgressTier {
                    band_gb: Some(40.0 * GB_PER_TB),
                    per_gb: 0.085,
                },
                EgressTier {
                    band_gb: Some(100.0 * GB_PER_TB),
                    per_gb: 0.07,
                },
                EgressTier {
                    band_gb: None,
                    per_gb: 0.05,
                },
            ],
            outposts_rack_monthly: 7000.0,
            outposts_rack_vcpu: 64,
            outposts_rack_memory: 512,
            region_multipliers,
        }
    }
}

impl PricingCatalog {
    /// Load the catalog: built-in defaults, then `path` (if any), then env.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&PricingCatalog::default())?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading pricing overrides");
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(PRICING_ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Price multiplier for a region, `None` if the region is not listed
    pub fn region_multiplier(&self, region: &str) -> Option<f64> {
        self.region_multipliers.get(region).copied()
    }

    /// Multiplier for a region, 1.0 when the region is not listed
    pub fn multiplier_or_default(&self, region: &str) -> f64 {
        self.region_multiplier(region).unwrap_or(1.0)
    }

    /// Monthly cost of one EKS control plane
    pub fn eks_cluster_monthly(&self) -> f64 {
        self.eks_cluster_hourly * HOURS_PER_MONTH
    }

    /// Look up an instance type
    pub fn instance(&self, name: &str) -> Option<&InstancePrice> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    /// First preferred instance type present in the catalog, else the default
    pub fn select_instance(&self, preferred: Option<&[String]>) -> Option<&InstancePrice> {
        preferred
            .into_iter()
            .flatten()
            .find_map(|name| self.instance(name))
            .or_else(|| self.instance(&self.default_instance))
    }

    /// Cost of sending `gb` through the internet gateway using the tier table
    pub fn internet_egress_cost(&self, gb: f64) -> f64 {
        let mut remaining = gb.max(0.0);
        let mut cost = 0.0;

        for tier in &self.internet_egress_tiers {
            if remaining <= 0.0 {
                break;
            }
            let in_tier = match tier.band_gb {
                Some(size) => remaining.min(size),
                None => remaining,
            };
            cost += in_tier * tier.per_gb;
            remaining -= in_tier;
        }

        // Anything beyond a table without an open-ended band bills at the last rate
        if remaining > 0.0 {
            if let Some(last) = self.internet_egress_tiers.last() {
                cost += remaining * last.per_gb;
            }
        }

        cost
    }

    /// Blended per-GB internet rate for a given volume
    pub fn average_internet_rate(&self, gb: f64) -> f64 {
        if gb <= 0.0 {
            return self
                .internet_egress_tiers
                .first()
                .map(|tier| tier.per_gb)
                .unwrap_or(0.0);
        }
        self.internet_egress_cost(gb) / gb
    }
}

/// Whether an instance type name denotes an AWS Graviton (ARM) family
pub fn is_graviton(instance_type: &str) -> bool {
    let family = instance_type.split('.').next().unwrap_or("");
    // Families look like m6g, c6gn, r7gd: generation digit then a `g`
    match family.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => family[idx..]
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .starts_with('g'),
        None => false,
    }
}
