//! Init command - write a default thisarg.toml

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use thisarg::config::CONFIG_FILE;
use thisarg::Config;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing thisarg.toml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, format: OutputFormat, _use_color: bool) -> Result<()> {
    fs::create_dir_all(&args.path)
        .with_context(|| format!("failed to create {}", args.path.display()))?;
    let config_path = args.path.join(CONFIG_FILE);

    let created = if config_path.exists() && !args.force {
        false
    } else {
        fs::write(&config_path, Config::default_toml())
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        true
    };

    match format {
        OutputFormat::Text => {
            if created {
                println!("  Created {}", config_path.display());
            } else {
                println!(
                    "  Skipped {} (already exists, use --force to overwrite)",
                    config_path.display()
                );
            }
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "created": created,
                "path": config_path.to_string_lossy(),
            });
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}
