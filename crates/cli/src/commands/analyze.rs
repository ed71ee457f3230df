//! `analyze`: full cost analysis of a deployment

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;
use tco_lib::{CostAnalysis, TelcoDeployment};

use crate::estimator::Estimator;
use crate::output::{print_heading, print_json, print_table, usd, OutputFormat};

/// Row for the cost breakdown table
#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Annual")]
    annual: String,
}

fn cost_rows(analysis: &CostAnalysis) -> Vec<CostRow> {
    analysis
        .monthly_costs()
        .line_items()
        .iter()
        .zip(analysis.annual_costs().line_items().iter())
        .map(|((component, monthly), (_, annual))| CostRow {
            component: component.to_string(),
            monthly: usd(*monthly),
            annual: usd(*annual),
        })
        .collect()
}

/// Run the analysis and print it
pub async fn analyze(
    estimator: &Estimator,
    deployment: &TelcoDeployment,
    format: OutputFormat,
) -> Result<()> {
    let analysis = estimator.analyze(deployment).await?;

    match format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Table => print_analysis(&analysis),
    }

    Ok(())
}

pub fn print_analysis(analysis: &CostAnalysis) {
    let deployment = analysis.deployment();

    print_heading("Telco TCO Analysis");
    println!(
        "User plane:             {}",
        deployment.user_plane().to_string().cyan()
    );
    println!("Region:                 {}", deployment.region().cyan());
    println!("Sites:                  {}", deployment.sites());
    println!("EKS clusters:           {}", deployment.eks_clusters());
    println!();

    print_table(cost_rows(analysis));
    println!();

    println!(
        "{}  {}",
        "3-year TCO:".bold(),
        usd(analysis.three_year_tco()).green().bold()
    );
    println!("Cost per site:          {}", usd(analysis.cost_per_site()));

    let savings = analysis.total_potential_savings();
    if savings > 0.0 {
        println!("Potential savings:      {}/month", usd(savings).green());
    }
    println!();

    print_list("Recommendations", analysis.recommendations());
    print_list("Assumptions", analysis.assumptions());
    print_list("Not included", analysis.exclusions());

    println!(
        "Generated: {}",
        chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    );
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", title.bold());
    println!("{}", "-".repeat(50));
    for item in items {
        println!("  • {}", item);
    }
    println!();
}
