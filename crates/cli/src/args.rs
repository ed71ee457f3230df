//! Deployment input shared by analyze, optimize and compare

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tco_lib::{
    ComputeResources, NetworkResources, StorageResources, TelcoDeployment, TrafficSplit,
    UserPlaneLocation, DEFAULT_REGION,
};

/// Describe the deployment either as a JSON file or with flags
#[derive(Debug, Clone, Args)]
pub struct DeploymentArgs {
    /// Deployment JSON file (see `telco-tco template`)
    #[arg(
        long,
        short,
        conflicts_with_all = [
            "user_plane",
            "vcpu",
            "memory",
            "instance_types",
            "ebs",
            "efs",
            "s3",
            "peak_bandwidth",
            "monthly_tonnage",
            "direct_connect_percent",
            "internet_gateway_percent",
            "eks_clusters",
            "sites",
            "region",
        ]
    )]
    pub file: Option<PathBuf>,

    /// User plane placement: region or outposts
    #[arg(long, default_value = "region")]
    pub user_plane: String,

    /// Total vCPUs across all sites
    #[arg(long, required_unless_present = "file")]
    pub vcpu: Option<u32>,

    /// Total memory in GB across all sites
    #[arg(long, required_unless_present = "file")]
    pub memory: Option<u32>,

    /// Preferred instance type (repeatable)
    #[arg(long = "instance-type")]
    pub instance_types: Vec<String>,

    /// Block storage in GB
    #[arg(long, default_value_t = 0)]
    pub ebs: u64,

    /// Shared file storage in GB
    #[arg(long, default_value_t = 0)]
    pub efs: u64,

    /// Object storage in GB
    #[arg(long, default_value_t = 0)]
    pub s3: u64,

    /// Peak bandwidth in Gbps
    #[arg(long, default_value_t = 0.0)]
    pub peak_bandwidth: f64,

    /// Monthly data transfer in TB
    #[arg(long, default_value_t = 0.0)]
    pub monthly_tonnage: f64,

    /// Share of traffic over Direct Connect, in percent
    #[arg(long, default_value_t = 80.0)]
    pub direct_connect_percent: f64,

    /// Share of traffic over the internet gateway, in percent
    #[arg(long, default_value_t = 20.0)]
    pub internet_gateway_percent: f64,

    /// Number of EKS clusters
    #[arg(long, default_value_t = 1)]
    pub eks_clusters: u32,

    /// Number of sites
    #[arg(long, default_value_t = 1)]
    pub sites: u32,

    /// AWS region
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,
}

impl DeploymentArgs {
    /// Build a validated deployment from the file or the flags
    pub fn to_deployment(&self) -> Result<TelcoDeployment> {
        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid deployment in {}", path.display()));
        }

        let user_plane: UserPlaneLocation = self.user_plane.parse()?;

        let vcpu = self.vcpu.context("--vcpu is required without --file")?;
        let memory = self.memory.context("--memory is required without --file")?;
        let mut compute = ComputeResources::new(vcpu, memory)?;
        if !self.instance_types.is_empty() {
            compute = compute.with_instance_types(self.instance_types.iter().cloned());
        }

        let split = TrafficSplit::new(self.direct_connect_percent, self.internet_gateway_percent)?;
        let network = NetworkResources::new(self.peak_bandwidth, self.monthly_tonnage, split)?;

        let deployment = TelcoDeployment::new(
            user_plane,
            compute,
            StorageResources::new(self.ebs, self.efs, self.s3),
            network,
            self.eks_clusters,
            self.sites,
            self.region.clone(),
        )?;

        Ok(deployment)
    }
}
