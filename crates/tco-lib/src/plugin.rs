//! Plugin entry point for the assistant host
//!
//! The host sends one JSON request per call, tagged by `command`, and gets
//! one JSON envelope back:
//!
//! ```json
//! {"command": "analyze", "deployment": { ... }}
//! {"status": "ok", "type": "analysis", "analysis": { ... }}
//! {"status": "error", "kind": "validation", "message": "vcpu must be >= 1, got 0"}
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calculator::NetworkCalculator;
use crate::error::{Result, TcoError};
use crate::models::{
    CostAnalysis, OptimizationRecommendation, TelcoDeployment, UserPlaneLocation,
};
use crate::observability::{StructuredLogger, TcoMetrics};
use crate::pricing::PricingCatalog;

pub const PLUGIN_NAME: &str = "telco-tco";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single call from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PluginRequest {
    /// Price a deployment
    Analyze { deployment: TelcoDeployment },
    /// Only the structured optimization recommendations
    Optimize { deployment: TelcoDeployment },
    /// Price the deployment with the user plane in-region and on Outposts
    ComparePlacement { deployment: TelcoDeployment },
    /// Plugin metadata
    Describe,
}

impl PluginRequest {
    pub fn command(&self) -> &'static str {
        match self {
            PluginRequest::Analyze { .. } => "analyze",
            PluginRequest::Optimize { .. } => "optimize",
            PluginRequest::ComparePlacement { .. } => "compare_placement",
            PluginRequest::Describe => "describe",
        }
    }
}

/// Region vs. Outposts pricing of the same workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementComparison {
    pub region: CostAnalysis,
    pub outposts: CostAnalysis,
    /// Location with the lower monthly total; region on a tie
    pub cheaper: UserPlaneLocation,
    /// Absolute difference between the two monthly totals
    pub monthly_difference: f64,
}

impl PlacementComparison {
    pub fn analysis_for(&self, location: UserPlaneLocation) -> &CostAnalysis {
        match location {
            UserPlaneLocation::Region => &self.region,
            UserPlaneLocation::Outposts => &self.outposts,
        }
    }
}

/// Plugin metadata returned by `describe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub commands: Vec<String>,
    pub pricing_version: String,
}

/// Successful plugin results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginResponse {
    Analysis { analysis: CostAnalysis },
    Recommendations { recommendations: Vec<OptimizationRecommendation> },
    PlacementComparison { comparison: PlacementComparison },
    Manifest { manifest: PluginManifest },
}

/// Wire envelope wrapping either a response or an error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PluginEnvelope {
    Ok(PluginResponse),
    Error { kind: String, message: String },
}

impl From<Result<PluginResponse>> for PluginEnvelope {
    fn from(result: Result<PluginResponse>) -> Self {
        match result {
            Ok(response) => PluginEnvelope::Ok(response),
            Err(err) => PluginEnvelope::Error {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Telco TCO plugin: the host-facing facade over calculator and optimizer
#[derive(Clone)]
pub struct TelcoTcoPlugin {
    calculator: NetworkCalculator,
    metrics: TcoMetrics,
    logger: StructuredLogger,
}

impl Default for TelcoTcoPlugin {
    fn default() -> Self {
        Self::new(Arc::new(PricingCatalog::default()))
    }
}

impl TelcoTcoPlugin {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            calculator: NetworkCalculator::new(catalog),
            metrics: TcoMetrics::new(),
            logger: StructuredLogger::new("plugin"),
        }
    }

    pub fn calculator(&self) -> &NetworkCalculator {
        &self.calculator
    }

    pub fn manifest(&self) -> PluginManifest {
        PluginManifest {
            name: PLUGIN_NAME.to_string(),
            version: PLUGIN_VERSION.to_string(),
            description: "Total cost of ownership estimates for telco workloads on AWS".to_string(),
            commands: ["analyze", "optimize", "compare_placement", "describe"]
                .into_iter()
                .map(String::from)
                .collect(),
            pricing_version: self.calculator.catalog().version.clone(),
        }
    }

    pub fn analyze(&self, deployment: &TelcoDeployment) -> Result<CostAnalysis> {
        self.calculator.calculate(deployment)
    }

    pub fn optimize(
        &self,
        deployment: &TelcoDeployment,
    ) -> Result<Vec<OptimizationRecommendation>> {
        let monthly = self.calculator.monthly_breakdown(deployment)?;
        self.calculator.optimizer().recommend(deployment, &monthly)
    }

    pub fn compare_placement(
        &self,
        deployment: &TelcoDeployment,
    ) -> Result<PlacementComparison> {
        let region = self
            .calculator
            .calculate(&deployment.with_user_plane(UserPlaneLocation::Region))?;
        let outposts = self
            .calculator
            .calculate(&deployment.with_user_plane(UserPlaneLocation::Outposts))?;

        let region_total = region.monthly_costs().total_monthly_cost();
        let outposts_total = outposts.monthly_costs().total_monthly_cost();
        let cheaper = if outposts_total < region_total {
            UserPlaneLocation::Outposts
        } else {
            UserPlaneLocation::Region
        };

        Ok(PlacementComparison {
            region,
            outposts,
            cheaper,
            monthly_difference: (region_total - outposts_total).abs(),
        })
    }

    /// Dispatch a typed request
    pub fn handle(&self, request: PluginRequest) -> Result<PluginResponse> {
        match request {
            PluginRequest::Analyze { deployment } => Ok(PluginResponse::Analysis {
                analysis: self.analyze(&deployment)?,
            }),
            PluginRequest::Optimize { deployment } => Ok(PluginResponse::Recommendations {
                recommendations: self.optimize(&deployment)?,
            }),
            PluginRequest::ComparePlacement { deployment } => {
                Ok(PluginResponse::PlacementComparison {
                    comparison: self.compare_placement(&deployment)?,
                })
            }
            PluginRequest::Describe => Ok(PluginResponse::Manifest {
                manifest: self.manifest(),
            }),
        }
    }

    /// Parse a JSON request; well-formed JSON with bad values is a validation error
    pub fn parse_request(&self, raw: &str) -> Result<PluginRequest> {
        serde_json::from_str(raw).map_err(|err| {
            if err.is_data() {
                self.metrics.inc_validation_failures();
                self.logger.log_validation_failure("request", &err.to_string());
                TcoError::InvalidInput(err.to_string())
            } else {
                TcoError::InvalidRequest(err.to_string())
            }
        })
    }

    /// JSON in, JSON envelope out; never fails
    pub fn handle_json(&self, raw: &str) -> String {
        let envelope: PluginEnvelope = self
            .parse_request(raw)
            .and_then(|request| self.handle(request))
            .into();

        serde_json::to_string(&envelope).unwrap_or_else(|err| {
            format!(
                r#"{{"status":"error","kind":"serialization","message":"{}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }
}
