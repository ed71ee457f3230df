//! Cost analysis result types
//!
//! [`CostAnalysis`] is an immutable snapshot assembled by
//! [`CostAnalysisBuilder`]. The builder only checks and derives figures;
//! pricing lives in the calculator.

use serde::{Deserialize, Serialize};

use super::deployment::TelcoDeployment;
use super::recommendation::OptimizationRecommendation;
use crate::error::{check_min_f64, ValidationError};

/// Months per year
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Horizon of the total-cost-of-ownership figure, in years
pub const TCO_YEARS: f64 = 3.0;

/// Cost by service over one period (a month or a year)
///
/// `total_monthly_cost` keeps its wire name on annual breakdowns too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CostBreakdownSpec")]
pub struct CostBreakdown {
    compute_cost: f64,
    storage_cost: f64,
    network_cost: f64,
    eks_cost: f64,
    data_transfer_cost: f64,
    total_monthly_cost: f64,
}

impl CostBreakdown {
    /// Build a breakdown from explicit figures, all finite and >= 0.
    ///
    /// The total is taken as given; it is not checked against the sum.
    pub fn new(
        compute_cost: f64,
        storage_cost: f64,
        network_cost: f64,
        eks_cost: f64,
        data_transfer_cost: f64,
        total_monthly_cost: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            compute_cost: check_min_f64("compute_cost", compute_cost, 0.0)?,
            storage_cost: check_min_f64("storage_cost", storage_cost, 0.0)?,
            network_cost: check_min_f64("network_cost", network_cost, 0.0)?,
            eks_cost: check_min_f64("eks_cost", eks_cost, 0.0)?,
            data_transfer_cost: check_min_f64("data_transfer_cost", data_transfer_cost, 0.0)?,
            total_monthly_cost: check_min_f64("total_monthly_cost", total_monthly_cost, 0.0)?,
        })
    }

    /// Build a breakdown whose total is the sum of the components
    pub fn from_components(
        compute_cost: f64,
        storage_cost: f64,
        network_cost: f64,
        eks_cost: f64,
        data_transfer_cost: f64,
    ) -> Result<Self, ValidationError> {
        let total = compute_cost + storage_cost + network_cost + eks_cost + data_transfer_cost;
        Self::new(
            compute_cost,
            storage_cost,
            network_cost,
            eks_cost,
            data_transfer_cost,
            total,
        )
    }

    /// Every figure multiplied by `factor` (e.g. 12 for an annual view)
    pub fn scaled(&self, factor: f64) -> Result<Self, ValidationError> {
        Self::new(
            self.compute_cost * factor,
            self.storage_cost * factor,
            self.network_cost * factor,
            self.eks_cost * factor,
            self.data_transfer_cost * factor,
            self.total_monthly_cost * factor,
        )
    }

    pub fn compute_cost(&self) -> f64 {
        self.compute_cost
    }

    pub fn storage_cost(&self) -> f64 {
        self.storage_cost
    }

    pub fn network_cost(&self) -> f64 {
        self.network_cost
    }

    pub fn eks_cost(&self) -> f64 {
        self.eks_cost
    }

    pub fn data_transfer_cost(&self) -> f64 {
        self.data_transfer_cost
    }

    pub fn total_monthly_cost(&self) -> f64 {
        self.total_monthly_cost
    }

    /// Sum of the five service figures, independent of the stored total
    pub fn component_sum(&self) -> f64 {
        self.compute_cost
            + self.storage_cost
            + self.network_cost
            + self.eks_cost
            + self.data_transfer_cost
    }

    /// `(label, amount)` pairs in display order, total last
    pub fn line_items(&self) -> [(&'static str, f64); 6] {
        [
            ("Compute", self.compute_cost),
            ("Storage", self.storage_cost),
            ("Network", self.network_cost),
            ("EKS", self.eks_cost),
            ("Data Transfer", self.data_transfer_cost),
            ("Total", self.total_monthly_cost),
        ]
    }
}

#[derive(Deserialize)]
struct CostBreakdownSpec {
    compute_cost: f64,
    storage_cost: f64,
    network_cost: f64,
    eks_cost: f64,
    data_transfer_cost: f64,
    total_monthly_cost: f64,
}

impl TryFrom<CostBreakdownSpec> for CostBreakdown {
    type Error = ValidationError;

    fn try_from(spec: CostBreakdownSpec) -> Result<Self, Self::Error> {
        CostBreakdown::new(
            spec.compute_cost,
            spec.storage_cost,
            spec.network_cost,
            spec.eks_cost,
            spec.data_transfer_cost,
            spec.total_monthly_cost,
        )
    }
}

/// Complete cost analysis for one deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CostAnalysisSpec")]
pub struct CostAnalysis {
    deployment: TelcoDeployment,
    monthly_costs: CostBreakdown,
    annual_costs: CostBreakdown,
    three_year_tco: f64,
    cost_per_site: f64,
    recommendations: Vec<String>,
    assumptions: Vec<String>,
    exclusions: Vec<String>,
    optimizations: Vec<OptimizationRecommendation>,
}

impl CostAnalysis {
    /// Start assembling an analysis
    pub fn builder(
        deployment: TelcoDeployment,
        monthly_costs: CostBreakdown,
        annual_costs: CostBreakdown,
    ) -> CostAnalysisBuilder {
        CostAnalysisBuilder::new(deployment, monthly_costs, annual_costs)
    }

    pub fn deployment(&self) -> &TelcoDeployment {
        &self.deployment
    }

    pub fn monthly_costs(&self) -> &CostBreakdown {
        &self.monthly_costs
    }

    pub fn annual_costs(&self) -> &CostBreakdown {
        &self.annual_costs
    }

    pub fn three_year_tco(&self) -> f64 {
        self.three_year_tco
    }

    /// Monthly cost attributed to each site
    pub fn cost_per_site(&self) -> f64 {
        self.cost_per_site
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn assumptions(&self) -> &[String] {
        &self.assumptions
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Structured counterparts of `recommendations`, possibly empty
    pub fn optimizations(&self) -> &[OptimizationRecommendation] {
        &self.optimizations
    }

    /// Sum of potential savings across structured optimizations
    pub fn total_potential_savings(&self) -> f64 {
        self.optimizations.iter().map(|o| o.potential_savings()).sum()
    }
}

/// Assembles a [`CostAnalysis`] from precomputed breakdowns
#[derive(Debug, Clone)]
pub struct CostAnalysisBuilder {
    deployment: TelcoDeployment,
    monthly_costs: CostBreakdown,
    annual_costs: CostBreakdown,
    three_year_tco: Option<f64>,
    cost_per_site: Option<f64>,
    recommendations: Vec<String>,
    assumptions: Vec<String>,
    exclusions: Vec<String>,
    optimizations: Vec<OptimizationRecommendation>,
}

impl CostAnalysisBuilder {
    pub fn new(
        deployment: TelcoDeployment,
        monthly_costs: CostBreakdown,
        annual_costs: CostBreakdown,
    ) -> Self {
        Self {
            deployment,
            monthly_costs,
            annual_costs,
            three_year_tco: None,
            cost_per_site: None,
            recommendations: Vec::new(),
            assumptions: Vec::new(),
            exclusions: Vec::new(),
            optimizations: Vec::new(),
        }
    }

    /// Override the derived three-year figure (default: annual total × 3)
    pub fn three_year_tco(mut self, value: f64) -> Self {
        self.three_year_tco = Some(value);
        self
    }

    /// Override the derived per-site figure (default: monthly total / sites)
    pub fn cost_per_site(mut self, value: f64) -> Self {
        self.cost_per_site = Some(value);
        self
    }

    pub fn recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendations.push(text.into());
        self
    }

    pub fn recommendations<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn assumption(mut self, text: impl Into<String>) -> Self {
        self.assumptions.push(text.into());
        self
    }

    pub fn assumptions<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assumptions.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn exclusions<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn optimizations(mut self, items: Vec<OptimizationRecommendation>) -> Self {
        self.optimizations = items;
        self
    }

    /// Validate the figures and freeze the analysis
    pub fn build(self) -> Result<CostAnalysis, ValidationError> {
        let three_year_tco = self
            .three_year_tco
            .unwrap_or(self.annual_costs.total_monthly_cost() * TCO_YEARS);
        let cost_per_site = self
            .cost_per_site
            .unwrap_or(self.monthly_costs.total_monthly_cost() / f64::from(self.deployment.sites()));

        Ok(CostAnalysis {
            three_year_tco: check_min_f64("three_year_tco", three_year_tco, 0.0)?,
            cost_per_site: check_min_f64("cost_per_site", cost_per_site, 0.0)?,
            deployment: self.deployment,
            monthly_costs: self.monthly_costs,
            annual_costs: self.annual_costs,
            recommendations: self.recommendations,
            assumptions: self.assumptions,
            exclusions: self.exclusions,
            optimizations: self.optimizations,
        })
    }
}

#[derive(Deserialize)]
struct CostAnalysisSpec {
    deployment: TelcoDeployment,
    monthly_costs: CostBreakdown,
    annual_costs: CostBreakdown,
    three_year_tco: f64,
    cost_per_site: f64,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    assumptions: Vec<String>,
    #[serde(default)]
    exclusions: Vec<String>,
    #[serde(default)]
    optimizations: Vec<OptimizationRecommendation>,
}

impl TryFrom<CostAnalysisSpec> for CostAnalysis {
    type Error = ValidationError;

    fn try_from(spec: CostAnalysisSpec) -> Result<Self, Self::Error> {
        CostAnalysisBuilder::new(spec.deployment, spec.monthly_costs, spec.annual_costs)
            .three_year_tco(spec.three_year_tco)
            .cost_per_site(spec.cost_per_site)
            .recommendations(spec.recommendations)
            .assumptions(spec.assumptions)
            .exclusions(spec.exclusions)
            .optimizations(spec.optimizations)
            .build()
    }
}
