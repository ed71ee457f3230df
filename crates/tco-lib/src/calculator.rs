//! Network cost calculator
//!
//! Prices a [`TelcoDeployment`] against a [`PricingCatalog`] and assembles
//! the [`CostAnalysis`] snapshot. All figures are monthly USD unless noted.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::{Result, TcoError};
use crate::models::{
    CostAnalysis, CostBreakdown, TelcoDeployment, UserPlaneLocation, MONTHS_PER_YEAR,
};
use crate::observability::{StructuredLogger, TcoMetrics};
use crate::optimizer::CostOptimizer;
use crate::pricing::{PricingCatalog, GB_PER_TB, HOURS_PER_MONTH};

/// Items deliberately left out of every estimate
pub const EXCLUSIONS: &[&str] = &[
    "AWS Support plan fees",
    "Taxes and duties",
    "Network function software licensing",
    "Migration and professional services",
    "Backup snapshots and disaster recovery copies",
    "Cross-AZ data transfer",
];

/// Region-based compute sizing
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSizing {
    pub instance_type: String,
    pub instance_vcpu: u32,
    pub instance_memory: u32,
    pub count: u32,
    pub monthly_cost: f64,
}

/// Outposts rack sizing
#[derive(Debug, Clone, PartialEq)]
pub struct RackSizing {
    pub racks_per_site: u32,
    pub monthly_cost: f64,
}

/// Size EC2 capacity for a region-hosted user plane
pub fn size_region_compute(
    catalog: &PricingCatalog,
    deployment: &TelcoDeployment,
) -> Result<InstanceSizing> {
    let compute = deployment.compute();
    let instance = catalog
        .select_instance(compute.instance_types())
        .ok_or_else(|| {
            TcoError::MissingRate(format!("instance type {}", catalog.default_instance))
        })?;

    let by_cpu = div_ceil(compute.vcpu(), instance.vcpu);
    let by_memory = div_ceil(compute.memory(), instance.memory);
    // At least one instance per site
    let count = by_cpu.max(by_memory).max(deployment.sites());

    let multiplier = catalog.multiplier_or_default(deployment.region());
    let monthly_cost = f64::from(count) * instance.hourly * HOURS_PER_MONTH * multiplier;

    Ok(InstanceSizing {
        instance_type: instance.name.clone(),
        instance_vcpu: instance.vcpu,
        instance_memory: instance.memory,
        count,
        monthly_cost,
    })
}

/// Size Outposts racks for an on-premises user plane
pub fn size_outposts(catalog: &PricingCatalog, deployment: &TelcoDeployment) -> RackSizing {
    let compute = deployment.compute();
    let sites = deployment.sites();

    let vcpu_per_site = div_ceil(compute.vcpu(), sites);
    let memory_per_site = div_ceil(compute.memory(), sites);
    let racks_per_site = div_ceil(vcpu_per_site, catalog.outposts_rack_vcpu)
        .max(div_ceil(memory_per_site, catalog.outposts_rack_memory))
        .max(1);

    let multiplier = catalog.multiplier_or_default(deployment.region());
    let monthly_cost =
        f64::from(racks_per_site) * f64::from(sites) * catalog.outposts_rack_monthly * multiplier;

    RackSizing {
        racks_per_site,
        monthly_cost,
    }
}

/// Direct Connect ports needed at each site
///
/// Every site is provisioned for the full peak so it can carry the
/// deployment's traffic on its own.
pub fn direct_connect_ports_per_site(
    catalog: &PricingCatalog,
    deployment: &TelcoDeployment,
) -> u32 {
    let network = deployment.network();
    let dc_fraction = network.traffic_split().direct_connect_fraction();
    if network.peak_bandwidth() <= 0.0 || dc_fraction <= 0.0 {
        return 0;
    }

    let port_gbps = catalog.direct_connect_port_gbps.max(f64::EPSILON);
    let direct_connect_gbps = network.peak_bandwidth() * dc_fraction;
    ((direct_connect_gbps / port_gbps).ceil() as u32).max(1)
}

fn div_ceil(value: u32, divisor: u32) -> u32 {
    value.div_ceil(divisor.max(1))
}

/// Prices deployments and assembles cost analyses
#[derive(Clone)]
pub struct NetworkCalculator {
    catalog: Arc<PricingCatalog>,
    optimizer: CostOptimizer,
    metrics: TcoMetrics,
    logger: StructuredLogger,
}

impl Default for NetworkCalculator {
    fn default() -> Self {
        Self::new(Arc::new(PricingCatalog::default()))
    }
}

impl NetworkCalculator {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            optimizer: CostOptimizer::new(Arc::clone(&catalog)),
            catalog,
            metrics: TcoMetrics::new(),
            logger: StructuredLogger::new("calculator"),
        }
    }

    pub fn catalog(&self) -> &PricingCatalog {
        &self.catalog
    }

    pub fn optimizer(&self) -> &CostOptimizer {
        &self.optimizer
    }

    /// Monthly cost breakdown for a deployment, without narrative
    pub fn monthly_breakdown(&self, deployment: &TelcoDeployment) -> Result<CostBreakdown> {
        Ok(self.quote(deployment)?.monthly)
    }

    /// Produce the full analysis: breakdowns, derived totals and narrative
    pub fn calculate(&self, deployment: &TelcoDeployment) -> Result<CostAnalysis> {
        let started = Instant::now();

        let Quote {
            monthly,
            assumptions,
        } = self.quote(deployment)?;
        let annual = monthly.scaled(MONTHS_PER_YEAR)?;

        let optimizations = self.optimizer.recommend(deployment, &monthly)?;
        let recommendations: Vec<String> = if optimizations.is_empty() {
            vec![
                "No significant optimization opportunities identified at the current sizing"
                    .to_string(),
            ]
        } else {
            optimizations
                .iter()
                .map(|o| {
                    format!(
                        "{}: {} (save ~${:.2}/month)",
                        o.category(),
                        o.description(),
                        o.potential_savings()
                    )
                })
                .collect()
        };

        let analysis = CostAnalysis::builder(deployment.clone(), monthly, annual)
            .recommendations(recommendations)
            .assumptions(assumptions)
            .exclusions(EXCLUSIONS.iter().copied())
            .optimizations(optimizations)
            .build()?;

        let user_plane = deployment.user_plane().as_str();
        self.metrics.record_analysis(
            deployment.region(),
            user_plane,
            monthly.total_monthly_cost(),
            started.elapsed().as_secs_f64(),
        );
        self.logger.log_analysis(
            deployment.region(),
            user_plane,
            deployment.sites(),
            monthly.total_monthly_cost(),
            analysis.three_year_tco(),
            analysis.recommendations().len(),
        );

        Ok(analysis)
    }

    fn quote(&self, deployment: &TelcoDeployment) -> Result<Quote> {
        let catalog = &*self.catalog;
        let mut assumptions = Vec::new();

        let multiplier = match catalog.region_multiplier(deployment.region()) {
            Some(multiplier) => {
                assumptions.push(format!(
                    "Prices are on-demand list rates ({}) with a {:.2}x multiplier for {}",
                    catalog.version,
                    multiplier,
                    deployment.region()
                ));
                multiplier
            }
            None => {
                assumptions.push(format!(
                    "Region {} is not in the pricing catalog; us-east-1 rates applied",
                    deployment.region()
                ));
                1.0
            }
        };
        assumptions.push(format!(
            "{} billable hours per month; 1 TB = {} GB",
            HOURS_PER_MONTH, GB_PER_TB
        ));

        let compute_cost = match deployment.user_plane() {
            UserPlaneLocation::Region => {
                let sizing = size_region_compute(catalog, deployment)?;
                assumptions.push(format!(
                    "{} x {} instances ({} vCPU / {} GB each) across {} site(s)",
                    sizing.count,
                    sizing.instance_type,
                    sizing.instance_vcpu,
                    sizing.instance_memory,
                    deployment.sites()
                ));
                sizing.monthly_cost
            }
            UserPlaneLocation::Outposts => {
                let sizing = size_outposts(catalog, deployment);
                assumptions.push(format!(
                    "{} Outposts rack(s) per site across {} site(s) at ${:.2} per rack-month",
                    sizing.racks_per_site,
                    deployment.sites(),
                    catalog.outposts_rack_monthly
                ));
                sizing.monthly_cost
            }
        };

        let storage = deployment.storage();
        let storage_cost = (storage.ebs_storage() as f64 * catalog.ebs_gp3_per_gb_month
            + storage.efs_storage() as f64 * catalog.efs_standard_per_gb_month
            + storage.s3_storage() as f64 * catalog.s3_standard_per_gb_month)
            * multiplier;
        assumptions.push("Storage priced as EBS gp3, EFS Standard and S3 Standard".to_string());

        let network = deployment.network();
        let split = network.traffic_split();
        let sites = f64::from(deployment.sites());

        let ports_per_site = direct_connect_ports_per_site(catalog, deployment);
        let port_cost = f64::from(ports_per_site)
            * sites
            * catalog.direct_connect_port_hourly
            * HOURS_PER_MONTH;
        let nat_cost = if split.internet_gateway_fraction() > 0.0 {
            catalog.nat_gateway_hourly * HOURS_PER_MONTH * sites
        } else {
            0.0
        };
        let network_cost = (port_cost + nat_cost) * multiplier;
        if ports_per_site > 0 {
            assumptions.push(format!(
                "{} x {} Gbps Direct Connect port(s) per site",
                ports_per_site, catalog.direct_connect_port_gbps
            ));
        }
        assumptions.push(format!(
            "Traffic split: {:.1}% Direct Connect, {:.1}% internet gateway",
            split.direct_connect_percent(),
            split.internet_gateway_percent()
        ));

        let eks_cost = f64::from(deployment.eks_clusters()) * catalog.eks_cluster_monthly();

        let total_gb = network.monthly_tonnage() * GB_PER_TB;
        let dc_gb = total_gb * split.direct_connect_fraction();
        let internet_gb = total_gb * split.internet_gateway_fraction();
        let data_transfer_cost = (dc_gb * catalog.direct_connect_egress_per_gb
            + catalog.internet_egress_cost(internet_gb)
            + internet_gb * catalog.nat_processing_per_gb)
            * multiplier;

        debug!(
            compute_cost,
            storage_cost, network_cost, eks_cost, data_transfer_cost, "Priced deployment"
        );

        let monthly = CostBreakdown::from_components(
            compute_cost,
            storage_cost,
            network_cost,
            eks_cost,
            data_transfer_cost,
        )?;

        Ok(Quote {
            monthly,
            assumptions,
        })
    }
}

struct Quote {
    monthly: CostBreakdown,
    assumptions: Vec<String>,
}
