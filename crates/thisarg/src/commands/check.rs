//! Check command - report receiver diagnostics without writing output

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use thisarg::transform_source;
use thisarg_diagnostics::{Diagnostics, SourceCache};

use super::{collect_sources, emit_diagnostics, load_config};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input file or directory
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Configuration file (default: nearest thisarg.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: CheckArgs, format: OutputFormat, use_color: bool, verbose: u8) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.input)?;
    let files = collect_sources(&args.input, Some(&config.output.out_dir));

    if files.is_empty() {
        match format {
            OutputFormat::Text => println!("No JavaScript files found."),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "files": 0,
                        "errors": 0,
                        "warnings": 0,
                    })
                );
            }
        }
        return Ok(());
    }

    if verbose > 0 && matches!(format, OutputFormat::Text) {
        println!("Checking {} file(s)...", files.len());
    }

    let mut cache = SourceCache::new();
    let mut all_diagnostics = Diagnostics::new();
    for file in &files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let filename = file.to_string_lossy().to_string();
        let output = transform_source(&source, &filename, &config.compile_options(file), &mut cache);
        all_diagnostics.extend(output.diagnostics);
    }

    emit_diagnostics(&all_diagnostics, &cache, format, use_color)?;

    let errors = all_diagnostics.error_count();
    let warnings = all_diagnostics.warning_count();
    let failed = errors > 0 || (args.strict && warnings > 0);

    if let OutputFormat::Text = format {
        if errors > 0 {
            if use_color {
                println!(
                    "{}: {} error(s), {} warning(s)",
                    console::style("Check failed").red().bold(),
                    errors,
                    warnings
                );
            } else {
                println!("Check failed: {} error(s), {} warning(s)", errors, warnings);
            }
        } else if failed {
            println!("Check failed: {} warning(s) (strict mode)", warnings);
        } else if use_color {
            println!(
                "{} - {} file(s) checked",
                console::style("All checks passed!").green().bold(),
                files.len()
            );
        } else {
            println!("All checks passed! - {} file(s) checked", files.len());
        }
    }

    if failed {
        Err(anyhow!("Check failed with errors"))
    } else {
        Ok(())
    }
}
