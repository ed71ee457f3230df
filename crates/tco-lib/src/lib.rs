//! Telco TCO library
//!
//! This crate provides the core functionality for:
//! - Validated deployment and cost analysis models
//! - Static pricing catalog with file/env overrides
//! - Cost calculation and optimization recommendations
//! - The plugin request/response contract for the assistant host
//! - Health checks and observability

pub mod calculator;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod optimizer;
pub mod plugin;
pub mod pricing;

pub use calculator::NetworkCalculator;
pub use error::{Result, TcoError, ValidationError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{StructuredLogger, TcoMetrics};
pub use optimizer::CostOptimizer;
pub use plugin::{
    PlacementComparison, PluginEnvelope, PluginManifest, PluginRequest, PluginResponse,
    TelcoTcoPlugin,
};
pub use pricing::PricingCatalog;
