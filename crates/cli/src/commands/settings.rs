//! `config`: view and update the stored CLI settings

use anyhow::Result;
use clap::ValueEnum;
use std::path::PathBuf;

use crate::config::Config;
use crate::output::{print_info, print_json, print_success, OutputFormat};

/// Print the current configuration
pub fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Table => {
            print_info(&format!("Config file: {}", Config::config_path()?.display()));
            println!(
                "api_url:        {}",
                config.api_url.as_deref().unwrap_or("(local)")
            );
            println!(
                "pricing_file:   {}",
                config
                    .pricing_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".to_string())
            );
            println!(
                "default_format: {}",
                config.default_format.as_deref().unwrap_or("table")
            );
        }
    }

    Ok(())
}

/// Update stored settings; unspecified values are kept
pub fn set(
    api_url: Option<String>,
    pricing_file: Option<PathBuf>,
    default_format: Option<OutputFormat>,
) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = api_url {
        url::Url::parse(&url)?;
        config.api_url = Some(url);
    }
    if let Some(path) = pricing_file {
        config.pricing_file = Some(path);
    }
    if let Some(format) = default_format {
        if let Some(value) = format.to_possible_value() {
            config.default_format = Some(value.get_name().to_string());
        }
    }

    let path = config.save()?;
    print_success(&format!("Saved {}", path.display()));

    Ok(())
}
