//! `compare`: the same workload priced in-region and on Outposts

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;
use tco_lib::{PlacementComparison, TelcoDeployment};

use crate::estimator::Estimator;
use crate::output::{print_heading, print_json, print_table, usd, OutputFormat};

/// Row for the side-by-side table
#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Outposts")]
    outposts: String,
}

fn comparison_rows(comparison: &PlacementComparison) -> Vec<ComparisonRow> {
    let region = comparison.region.monthly_costs().line_items();
    let outposts = comparison.outposts.monthly_costs().line_items();

    region
        .iter()
        .zip(outposts.iter())
        .map(|((component, r), (_, o))| ComparisonRow {
            component: component.to_string(),
            region: usd(*r),
            outposts: usd(*o),
        })
        .chain(std::iter::once(ComparisonRow {
            component: "3-year TCO".to_string(),
            region: usd(comparison.region.three_year_tco()),
            outposts: usd(comparison.outposts.three_year_tco()),
        }))
        .collect()
}

/// Price both placements and print the comparison
pub async fn compare(
    estimator: &Estimator,
    deployment: &TelcoDeployment,
    format: OutputFormat,
) -> Result<()> {
    let comparison = estimator.compare(deployment).await?;

    match format {
        OutputFormat::Json => print_json(&comparison)?,
        OutputFormat::Table => {
            print_heading("User Plane Placement (monthly)");
            print_table(comparison_rows(&comparison));
            println!();
            println!(
                "{} {} by {}/month",
                "Cheaper:".bold(),
                comparison.cheaper.to_string().green().bold(),
                usd(comparison.monthly_difference)
            );
        }
    }

    Ok(())
}
