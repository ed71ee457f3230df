//! Local or remote execution of TCO requests

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tco_lib::{
    CostAnalysis, OptimizationRecommendation, PlacementComparison, PricingCatalog,
    TelcoDeployment, TelcoTcoPlugin,
};
use tracing::debug;

use crate::client::ApiClient;
use crate::output::print_warning;

/// Where estimates are computed
pub enum Estimator {
    /// In-process, against a local pricing catalog
    Local(TelcoTcoPlugin),
    /// Against a tco-server
    Remote(ApiClient),
}

impl Estimator {
    /// Remote when `api_url` is set, otherwise local with the given catalog
    pub fn from_options(api_url: Option<&str>, pricing: Option<&Path>) -> Result<Self> {
        if let Some(url) = api_url {
            if pricing.is_some() {
                print_warning("--pricing is ignored when --api-url is set");
            }
            debug!(api_url = url, "Using remote estimator");
            return Ok(Estimator::Remote(ApiClient::new(url)?));
        }

        let catalog = PricingCatalog::load(pricing).context("Failed to load pricing catalog")?;
        debug!(pricing_version = %catalog.version, "Using local estimator");
        Ok(Estimator::Local(TelcoTcoPlugin::new(Arc::new(catalog))))
    }

    pub async fn analyze(&self, deployment: &TelcoDeployment) -> Result<CostAnalysis> {
        match self {
            Estimator::Local(plugin) => Ok(plugin.analyze(deployment)?),
            Estimator::Remote(client) => client.analyze(deployment).await,
        }
    }

    pub async fn optimize(
        &self,
        deployment: &TelcoDeployment,
    ) -> Result<Vec<OptimizationRecommendation>> {
        match self {
            Estimator::Local(plugin) => Ok(plugin.optimize(deployment)?),
            Estimator::Remote(client) => client.optimize(deployment).await,
        }
    }

    pub async fn compare(&self, deployment: &TelcoDeployment) -> Result<PlacementComparison> {
        match self {
            Estimator::Local(plugin) => Ok(plugin.compare_placement(deployment)?),
            Estimator::Remote(client) => client.compare(deployment).await,
        }
    }
}
