//! Deployment specification types
//!
//! A [`TelcoDeployment`] is the sole input to cost calculation. Every type
//! here validates in its constructor and again when deserialized, so a
//! value that exists always satisfies its invariants.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{check_min_f64, check_range_f64, check_u32, check_u64, ValidationError};

/// Region used when a deployment does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Maximum allowed deviation of a traffic split sum from 100%
pub const SPLIT_TOLERANCE: f64 = 0.01;

const DEFAULT_DIRECT_CONNECT_PERCENT: f64 = 80.0;
const DEFAULT_INTERNET_GATEWAY_PERCENT: f64 = 20.0;

/// Integer input that also accepts integral floats such as `4.0`
#[derive(Debug, Clone, Copy, Default)]
struct WholeNumber(i64);

impl<'de> Deserialize<'de> for WholeNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WholeNumberVisitor;

        impl Visitor<'_> for WholeNumberVisitor {
            type Value = WholeNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a whole number")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<WholeNumber, E> {
                Ok(WholeNumber(value))
            }

            // Out-of-range values saturate and then fail the range checks
            fn visit_u64<E: de::Error>(self, value: u64) -> Result<WholeNumber, E> {
                Ok(WholeNumber(i64::try_from(value).unwrap_or(i64::MAX)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<WholeNumber, E> {
                if value.is_finite() && value.fract() == 0.0 {
                    Ok(WholeNumber(value as i64))
                } else {
                    Err(E::invalid_value(Unexpected::Float(value), &self))
                }
            }
        }

        deserializer.deserialize_any(WholeNumberVisitor)
    }
}

/// Where the user-plane workload physically runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserPlaneLocation {
    /// In an AWS region
    Region,
    /// On AWS Outposts racks at the operator's sites
    Outposts,
}

impl UserPlaneLocation {
    pub const ALL: [UserPlaneLocation; 2] = [UserPlaneLocation::Region, UserPlaneLocation::Outposts];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserPlaneLocation::Region => "region",
            UserPlaneLocation::Outposts => "outposts",
        }
    }
}

impl fmt::Display for UserPlaneLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserPlaneLocation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(UserPlaneLocation::Region),
            "outposts" => Ok(UserPlaneLocation::Outposts),
            other => Err(ValidationError::NotAllowed {
                field: "user_plane",
                allowed: "region, outposts",
                actual: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for UserPlaneLocation {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Split of outbound traffic between Direct Connect and the internet gateway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrafficSplitSpec")]
pub struct TrafficSplit {
    direct_connect_percent: f64,
    internet_gateway_percent: f64,
}

impl TrafficSplit {
    /// Build a split, checking each bound and then the sum
    pub fn new(
        direct_connect_percent: f64,
        internet_gateway_percent: f64,
    ) -> Result<Self, ValidationError> {
        let direct_connect_percent =
            check_range_f64("direct_connect_percent", direct_connect_percent, 0.0, 100.0)?;
        let internet_gateway_percent = check_range_f64(
            "internet_gateway_percent",
            internet_gateway_percent,
            0.0,
            100.0,
        )?;

        let sum = direct_connect_percent + internet_gateway_percent;
        if (sum - 100.0).abs() > SPLIT_TOLERANCE {
            return Err(ValidationError::SplitSum {
                actual: sum,
                tolerance: SPLIT_TOLERANCE,
            });
        }

        Ok(Self {
            direct_connect_percent,
            internet_gateway_percent,
        })
    }

    pub fn direct_connect_percent(&self) -> f64 {
        self.direct_connect_percent
    }

    pub fn internet_gateway_percent(&self) -> f64 {
        self.internet_gateway_percent
    }

    /// Direct Connect share as a fraction in `[0, 1]`
    pub fn direct_connect_fraction(&self) -> f64 {
        self.direct_connect_percent / 100.0
    }

    /// Internet gateway share as a fraction in `[0, 1]`
    pub fn internet_gateway_fraction(&self) -> f64 {
        self.internet_gateway_percent / 100.0
    }
}

impl Default for TrafficSplit {
    fn default() -> Self {
        Self {
            direct_connect_percent: DEFAULT_DIRECT_CONNECT_PERCENT,
            internet_gateway_percent: DEFAULT_INTERNET_GATEWAY_PERCENT,
        }
    }
}

#[derive(Deserialize)]
struct TrafficSplitSpec {
    #[serde(default = "default_direct_connect_percent")]
    direct_connect_percent: f64,
    #[serde(default = "default_internet_gateway_percent")]
    internet_gateway_percent: f64,
}

fn default_direct_connect_percent() -> f64 {
    DEFAULT_DIRECT_CONNECT_PERCENT
}

fn default_internet_gateway_percent() -> f64 {
    DEFAULT_INTERNET_GATEWAY_PERCENT
}

impl TryFrom<TrafficSplitSpec> for TrafficSplit {
    type Error = ValidationError;

    fn try_from(spec: TrafficSplitSpec) -> Result<Self, Self::Error> {
        TrafficSplit::new(spec.direct_connect_percent, spec.internet_gateway_percent)
    }
}

/// Compute requirements across the whole deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComputeResourcesSpec")]
pub struct ComputeResources {
    vcpu: u32,
    memory: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance_types: Option<Vec<String>>,
}

impl ComputeResources {
    /// `vcpu` and `memory` (GB) must both be at least 1
    pub fn new(vcpu: u32, memory: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            vcpu: check_u32("vcpu", i64::from(vcpu), 1)?,
            memory: check_u32("memory", i64::from(memory), 1)?,
            instance_types: None,
        })
    }

    /// Attach preferred EC2 instance types, most preferred first
    pub fn with_instance_types<I, S>(mut self, instance_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instance_types = Some(instance_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn vcpu(&self) -> u32 {
        self.vcpu
    }

    /// Total memory in GB
    pub fn memory(&self) -> u32 {
        self.memory
    }

    pub fn instance_types(&self) -> Option<&[String]> {
        self.instance_types.as_deref()
    }
}

#[derive(Deserialize)]
struct ComputeResourcesSpec {
    vcpu: WholeNumber,
    memory: WholeNumber,
    #[serde(default)]
    instance_types: Option<Vec<String>>,
}

impl TryFrom<ComputeResourcesSpec> for ComputeResources {
    type Error = ValidationError;

    fn try_from(spec: ComputeResourcesSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            vcpu: check_u32("vcpu", spec.vcpu.0, 1)?,
            memory: check_u32("memory", spec.memory.0, 1)?,
            instance_types: spec.instance_types,
        })
    }
}

/// Storage requirements in GB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StorageResourcesSpec")]
pub struct StorageResources {
    ebs_storage: u64,
    efs_storage: u64,
    s3_storage: u64,
}

impl StorageResources {
    /// Unsigned sizes carry the non-negative bound, so this cannot fail
    pub fn new(ebs_storage: u64, efs_storage: u64, s3_storage: u64) -> Self {
        Self {
            ebs_storage,
            efs_storage,
            s3_storage,
        }
    }

    /// Block storage in GB
    pub fn ebs_storage(&self) -> u64 {
        self.ebs_storage
    }

    /// Networked file storage in GB
    pub fn efs_storage(&self) -> u64 {
        self.efs_storage
    }

    /// Object storage in GB
    pub fn s3_storage(&self) -> u64 {
        self.s3_storage
    }
}

#[derive(Deserialize)]
struct StorageResourcesSpec {
    ebs_storage: WholeNumber,
    efs_storage: WholeNumber,
    #[serde(default)]
    s3_storage: WholeNumber,
}

impl TryFrom<StorageResourcesSpec> for StorageResources {
    type Error = ValidationError;

    fn try_from(spec: StorageResourcesSpec) -> Result<Self, Self::Error> {
        Ok(Self {
            ebs_storage: check_u64("ebs_storage", spec.ebs_storage.0)?,
            efs_storage: check_u64("efs_storage", spec.efs_storage.0)?,
            s3_storage: check_u64("s3_storage", spec.s3_storage.0)?,
        })
    }
}

/// Network sizing: peak bandwidth, monthly volume and routing split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkResourcesSpec")]
pub struct NetworkResources {
    peak_bandwidth: f64,
    monthly_tonnage: f64,
    traffic_split: TrafficSplit,
}

impl NetworkResources {
    /// `peak_bandwidth` in Gbps and `monthly_tonnage` in TB, both >= 0
    pub fn new(
        peak_bandwidth: f64,
        monthly_tonnage: f64,
        traffic_split: TrafficSplit,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            peak_bandwidth: check_min_f64("peak_bandwidth", peak_bandwidth, 0.0)?,
            monthly_tonnage: check_min_f64("monthly_tonnage", monthly_tonnage, 0.0)?,
            traffic_split,
        })
    }

    /// Same as [`NetworkResources::new`] with the default 80/20 split
    pub fn with_default_split(
        peak_bandwidth: f64,
        monthly_tonnage: f64,
    ) -> Result<Self, ValidationError> {
        Self::new(peak_bandwidth, monthly_tonnage, TrafficSplit::default())
    }

    /// Peak bandwidth in Gbps
    pub fn peak_bandwidth(&self) -> f64 {
        self.peak_bandwidth
    }

    /// Monthly data transfer in TB
    pub fn monthly_tonnage(&self) -> f64 {
        self.monthly_tonnage
    }

    pub fn traffic_split(&self) -> &TrafficSplit {
        &self.traffic_split
    }
}

#[derive(Deserialize)]
struct NetworkResourcesSpec {
    peak_bandwidth: f64,
    monthly_tonnage: f64,
    #[serde(default)]
    traffic_split: TrafficSplit,
}

impl TryFrom<NetworkResourcesSpec> for NetworkResources {
    type Error = ValidationError;

    fn try_from(spec: NetworkResourcesSpec) -> Result<Self, Self::Error> {
        NetworkResources::new(spec.peak_bandwidth, spec.monthly_tonnage, spec.traffic_split)
    }
}

/// Complete telco deployment specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TelcoDeploymentSpec")]
pub struct TelcoDeployment {
    user_plane: UserPlaneLocation,
    compute: ComputeResources,
    storage: StorageResources,
    network: NetworkResources,
    eks_clusters: u32,
    sites: u32,
    region: String,
}

impl TelcoDeployment {
    /// `eks_clusters` and `sites` must be at least 1; `region` must not be blank
    pub fn new(
        user_plane: UserPlaneLocation,
        compute: ComputeResources,
        storage: StorageResources,
        network: NetworkResources,
        eks_clusters: u32,
        sites: u32,
        region: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let region = region.into().trim().to_string();
        if region.is_empty() {
            return Err(ValidationError::Blank { field: "region" });
        }

        Ok(Self {
            user_plane,
            compute,
            storage,
            network,
            eks_clusters: check_u32("eks_clusters", i64::from(eks_clusters), 1)?,
            sites: check_u32("sites", i64::from(sites), 1)?,
            region,
        })
    }

    pub fn user_plane(&self) -> UserPlaneLocation {
        self.user_plane
    }

    pub fn compute(&self) -> &ComputeResources {
        &self.compute
    }

    pub fn storage(&self) -> &StorageResources {
        &self.storage
    }

    pub fn network(&self) -> &NetworkResources {
        &self.network
    }

    pub fn eks_clusters(&self) -> u32 {
        self.eks_clusters
    }

    pub fn sites(&self) -> u32 {
        self.sites
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Copy of this deployment with the user plane moved elsewhere
    pub fn with_user_plane(&self, user_plane: UserPlaneLocation) -> Self {
        Self {
            user_plane,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
struct TelcoDeploymentSpec {
    user_plane: UserPlaneLocation,
    compute: ComputeResources,
    storage: StorageResources,
    network: NetworkResources,
    eks_clusters: WholeNumber,
    sites: WholeNumber,
    #[serde(default = "default_region")]
    region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl TryFrom<TelcoDeploymentSpec> for TelcoDeployment {
    type Error = ValidationError;

    fn try_from(spec: TelcoDeploymentSpec) -> Result<Self, Self::Error> {
        TelcoDeployment::new(
            spec.user_plane,
            spec.compute,
            spec.storage,
            spec.network,
            check_u32("eks_clusters", spec.eks_clusters.0, 1)?,
            check_u32("sites", spec.sites.0, 1)?,
            spec.region,
        )
    }
}
