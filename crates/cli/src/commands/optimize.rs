//! `optimize`: prioritized cost optimization recommendations

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;
use tco_lib::{OptimizationRecommendation, TelcoDeployment};

use crate::estimator::Estimator;
use crate::output::{color_priority, print_info, print_json, print_table, usd, OutputFormat};

/// Row for the recommendations table
#[derive(Tabled)]
struct OptimizationRow {
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Savings/month")]
    savings: String,
    #[tabled(rename = "Effort")]
    effort: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&OptimizationRecommendation> for OptimizationRow {
    fn from(rec: &OptimizationRecommendation) -> Self {
        Self {
            priority: color_priority(rec.priority()),
            category: rec.category().to_string(),
            savings: usd(rec.potential_savings()),
            effort: rec.implementation_effort().to_string(),
            description: rec.description().to_string(),
        }
    }
}

/// Fetch and print recommendations
pub async fn optimize(
    estimator: &Estimator,
    deployment: &TelcoDeployment,
    format: OutputFormat,
) -> Result<()> {
    let recommendations = estimator.optimize(deployment).await?;

    match format {
        OutputFormat::Json => print_json(&recommendations)?,
        OutputFormat::Table => {
            if recommendations.is_empty() {
                print_info("No significant optimization opportunities found");
                return Ok(());
            }

            print_table(recommendations.iter().map(OptimizationRow::from).collect());

            let total: f64 = recommendations.iter().map(|r| r.potential_savings()).sum();
            println!();
            println!(
                "{} {}/month ({}/year)",
                "Total potential savings:".bold(),
                usd(total).green().bold(),
                usd(total * 12.0)
            );
        }
    }

    Ok(())
}
