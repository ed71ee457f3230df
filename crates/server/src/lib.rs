//! HTTP host for the telco TCO plugin
//!
//! Exposes the calculator, optimizer and placement comparison as JSON
//! endpoints next to health probes and Prometheus metrics.

pub mod api;
pub mod config;
