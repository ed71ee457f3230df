//! Core data models for telco TCO analysis
//!
//! - [`deployment`] - the validated deployment specification
//! - [`cost`] - cost breakdowns and the analysis snapshot
//! - [`recommendation`] - structured optimization recommendations

mod cost;
mod deployment;
mod recommendation;

pub use cost::{CostAnalysis, CostAnalysisBuilder, CostBreakdown, MONTHS_PER_YEAR, TCO_YEARS};
pub use deployment::{
    ComputeResources, NetworkResources, StorageResources, TelcoDeployment, TrafficSplit,
    UserPlaneLocation, DEFAULT_REGION, SPLIT_TOLERANCE,
};
pub use recommendation::{ImplementationEffort, OptimizationRecommendation, Priority};

#[cfg(test)]
mod tests;
