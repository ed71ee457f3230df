//! Cost optimization rules
//!
//! Each rule looks at the deployment and its monthly breakdown and may
//! emit one [`OptimizationRecommendation`]. Output is ordered by priority
//! (High first), then by savings.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::calculator::size_region_compute;
use crate::error::Result;
use crate::models::{
    CostAnalysis, CostBreakdown, ImplementationEffort, OptimizationRecommendation, Priority,
    TelcoDeployment, UserPlaneLocation,
};
use crate::observability::{StructuredLogger, TcoMetrics};
use crate::pricing::{is_graviton, PricingCatalog, GB_PER_TB};

/// Typical discount of a one-year Compute Savings Plan
pub const SAVINGS_PLAN_DISCOUNT: f64 = 0.28;

/// Typical price/performance gain moving to Graviton instances
pub const GRAVITON_DISCOUNT: f64 = 0.20;

/// Internet share the Direct Connect rule aims for, in percent
pub const TARGET_INTERNET_PERCENT: f64 = 20.0;

/// Compute share of the total above which Savings Plans become High priority
const COMPUTE_DOMINANT_SHARE: f64 = 0.40;

/// Monthly savings above which a Direct Connect shift is High priority
const HIGH_VALUE_SAVINGS: f64 = 1000.0;

const S3_TIERING_MIN_GB: u64 = 10_000;
const S3_TIERING_DISCOUNT: f64 = 0.30;

const EFS_IA_MIN_GB: u64 = 1_000;
const EFS_IA_DISCOUNT: f64 = 0.50;

pub mod categories {
    pub const COMPUTE: &str = "Compute";
    pub const NETWORK: &str = "Network";
    pub const ORCHESTRATION: &str = "Orchestration";
    pub const STORAGE: &str = "Storage";
    pub const PLACEMENT: &str = "Placement";
}

/// Rule-based optimizer over a priced deployment
#[derive(Clone)]
pub struct CostOptimizer {
    catalog: Arc<PricingCatalog>,
    metrics: TcoMetrics,
    logger: StructuredLogger,
}

impl Default for CostOptimizer {
    fn default() -> Self {
        Self::new(Arc::new(PricingCatalog::default()))
    }
}

impl CostOptimizer {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            catalog,
            metrics: TcoMetrics::new(),
            logger: StructuredLogger::new("optimizer"),
        }
    }

    /// Recommendations for an existing analysis
    pub fn optimize(&self, analysis: &CostAnalysis) -> Result<Vec<OptimizationRecommendation>> {
        self.recommend(analysis.deployment(), analysis.monthly_costs())
    }

    /// Run every rule against a deployment and its monthly costs
    pub fn recommend(
        &self,
        deployment: &TelcoDeployment,
        monthly: &CostBreakdown,
    ) -> Result<Vec<OptimizationRecommendation>> {
        let mut out = Vec::new();

        self.savings_plans(deployment, monthly, &mut out)?;
        self.graviton(deployment, monthly, &mut out)?;
        self.direct_connect_shift(deployment, &mut out)?;
        self.eks_consolidation(deployment, &mut out)?;
        self.s3_tiering(deployment, &mut out)?;
        self.efs_infrequent_access(deployment, &mut out)?;
        self.outposts_utilization(deployment, monthly, &mut out)?;

        out.retain(|rec| rec.potential_savings() > 0.0);
        out.sort_by(|a, b| {
            a.priority().cmp(&b.priority()).then_with(|| {
                b.potential_savings()
                    .partial_cmp(&a.potential_savings())
                    .unwrap_or(Ordering::Equal)
            })
        });

        let total: f64 = out.iter().map(|rec| rec.potential_savings()).sum();
        self.metrics.add_optimizations(out.len());
        self.logger.log_optimizations(out.len(), total);

        Ok(out)
    }

    fn multiplier(&self, deployment: &TelcoDeployment) -> f64 {
        self.catalog.multiplier_or_default(deployment.region())
    }

    fn savings_plans(
        &self,
        deployment: &TelcoDeployment,
        monthly: &CostBreakdown,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        if deployment.user_plane() != UserPlaneLocation::Region || monthly.compute_cost() <= 0.0 {
            return Ok(());
        }

        let compute_share = if monthly.total_monthly_cost() > 0.0 {
            monthly.compute_cost() / monthly.total_monthly_cost()
        } else {
            0.0
        };
        let priority = if compute_share >= COMPUTE_DOMINANT_SHARE {
            Priority::High
        } else {
            Priority::Medium
        };

        out.push(OptimizationRecommendation::new(
            categories::COMPUTE,
            "Commit to a 1-year Compute Savings Plan for steady-state user-plane capacity",
            monthly.compute_cost() * SAVINGS_PLAN_DISCOUNT,
            ImplementationEffort::Low,
            priority,
        )?);
        Ok(())
    }

    fn graviton(
        &self,
        deployment: &TelcoDeployment,
        monthly: &CostBreakdown,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        if deployment.user_plane() != UserPlaneLocation::Region || monthly.compute_cost() <= 0.0 {
            return Ok(());
        }

        // Preferences missing from the catalog fall through to another type
        let priced = size_region_compute(&self.catalog, deployment)?;
        if is_graviton(&priced.instance_type) {
            return Ok(());
        }

        out.push(OptimizationRecommendation::new(
            categories::COMPUTE,
            "Move network functions to Graviton (ARM) instances such as c6gn or m6g",
            monthly.compute_cost() * GRAVITON_DISCOUNT,
            ImplementationEffort::Medium,
            Priority::Medium,
        )?);
        Ok(())
    }

    fn direct_connect_shift(
        &self,
        deployment: &TelcoDeployment,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        let network = deployment.network();
        let split = network.traffic_split();
        if split.internet_gateway_percent() <= TARGET_INTERNET_PERCENT
            || network.monthly_tonnage() <= 0.0
        {
            return Ok(());
        }

        let total_gb = network.monthly_tonnage() * GB_PER_TB;
        let internet_gb = total_gb * split.internet_gateway_fraction();
        let shifted_gb = internet_gb - total_gb * TARGET_INTERNET_PERCENT / 100.0;

        let catalog = &self.catalog;
        let per_gb_saving = catalog.average_internet_rate(internet_gb)
            + catalog.nat_processing_per_gb
            - catalog.direct_connect_egress_per_gb;
        let savings = shifted_gb * per_gb_saving * self.multiplier(deployment);
        if savings <= 0.0 {
            return Ok(());
        }

        let priority = if savings > HIGH_VALUE_SAVINGS {
            Priority::High
        } else {
            Priority::Medium
        };

        out.push(OptimizationRecommendation::new(
            categories::NETWORK,
            format!(
                "Route more traffic over Direct Connect to bring the internet share from {:.0}% to {:.0}%",
                split.internet_gateway_percent(),
                TARGET_INTERNET_PERCENT
            ),
            savings,
            ImplementationEffort::High,
            priority,
        )?);
        Ok(())
    }

    fn eks_consolidation(
        &self,
        deployment: &TelcoDeployment,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        if deployment.eks_clusters() <= deployment.sites() {
            return Ok(());
        }

        let surplus = deployment.eks_clusters() - deployment.sites();
        out.push(OptimizationRecommendation::new(
            categories::ORCHESTRATION,
            format!(
                "Consolidate {} EKS clusters to one per site ({} total) using namespaces for isolation",
                deployment.eks_clusters(),
                deployment.sites()
            ),
            f64::from(surplus) * self.catalog.eks_cluster_monthly(),
            ImplementationEffort::Medium,
            Priority::Low,
        )?);
        Ok(())
    }

    fn s3_tiering(
        &self,
        deployment: &TelcoDeployment,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        let s3_gb = deployment.storage().s3_storage();
        if s3_gb < S3_TIERING_MIN_GB {
            return Ok(());
        }

        let s3_cost =
            s3_gb as f64 * self.catalog.s3_standard_per_gb_month * self.multiplier(deployment);
        out.push(OptimizationRecommendation::new(
            categories::STORAGE,
            "Enable S3 Intelligent-Tiering for call records and logs",
            s3_cost * S3_TIERING_DISCOUNT,
            ImplementationEffort::Low,
            Priority::Low,
        )?);
        Ok(())
    }

    fn efs_infrequent_access(
        &self,
        deployment: &TelcoDeployment,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        let efs_gb = deployment.storage().efs_storage();
        if efs_gb < EFS_IA_MIN_GB {
            return Ok(());
        }

        let efs_cost =
            efs_gb as f64 * self.catalog.efs_standard_per_gb_month * self.multiplier(deployment);
        out.push(OptimizationRecommendation::new(
            categories::STORAGE,
            "Add an EFS lifecycle policy to move cold files to Infrequent Access",
            efs_cost * EFS_IA_DISCOUNT,
            ImplementationEffort::Low,
            Priority::Medium,
        )?);
        Ok(())
    }

    fn outposts_utilization(
        &self,
        deployment: &TelcoDeployment,
        monthly: &CostBreakdown,
        out: &mut Vec<OptimizationRecommendation>,
    ) -> Result<()> {
        if deployment.user_plane() != UserPlaneLocation::Outposts {
            return Ok(());
        }

        let region_equivalent = size_region_compute(&self.catalog, deployment)?;
        let savings = monthly.compute_cost() - region_equivalent.monthly_cost;
        if savings <= 0.0 {
            return Ok(());
        }

        out.push(OptimizationRecommendation::new(
            categories::PLACEMENT,
            format!(
                "Outposts racks are under-utilized; hosting the user plane in-region on {} x {} would cost less",
                region_equivalent.count, region_equivalent.instance_type
            ),
            savings,
            ImplementationEffort::High,
            Priority::Medium,
        )?);
        Ok(())
    }
}
