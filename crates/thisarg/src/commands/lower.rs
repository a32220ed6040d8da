//! Lower command - rewrite explicit receivers into standard JavaScript

use anyhow::{anyhow, Context, Result};
use clap::Args;
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use thisarg::transform_source;
use thisarg_diagnostics::{Diagnostics, SourceCache};

use super::{collect_sources, emit_diagnostics, load_config};
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct LowerArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// Output directory (default: `[output] out_dir` from thisarg.toml)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print lowered code to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Show a unified diff between input and lowered output
    #[arg(long, conflicts_with = "stdout")]
    pub diff: bool,

    /// Re-parse the output to confirm it is standard syntax
    #[arg(long)]
    pub verify: bool,

    /// Configuration file (default: nearest thisarg.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where the lowered version of `file` goes, mirroring its position under
/// `root`.
fn output_path(file: &Path, root: &Path, out_dir: &Path) -> PathBuf {
    let relative = if root.is_file() {
        file.file_name().map(PathBuf::from)
    } else {
        file.strip_prefix(root).ok().map(Path::to_path_buf)
    };
    out_dir.join(relative.unwrap_or_else(|| file.to_path_buf()))
}

pub fn run(args: LowerArgs, format: OutputFormat, use_color: bool, quiet: bool) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.input)?;
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.output.out_dir.clone());

    let files = collect_sources(&args.input, Some(&out_dir));
    if files.is_empty() {
        return Err(anyhow!("no JavaScript sources found in {}", args.input.display()));
    }

    let mut cache = SourceCache::new();
    let mut all_diagnostics = Diagnostics::new();
    let mut written = Vec::new();
    let mut failed_units = 0;

    for file in &files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let filename = file.to_string_lossy().to_string();

        let mut options = config.compile_options(file);
        options.verify |= args.verify;

        let output = transform_source(&source, &filename, &options, &mut cache);
        log::info!(
            "{}: {} receiver(s) lowered",
            filename,
            output.stats.functions
        );
        if output.has_errors() {
            failed_units += 1;
        }

        if let Some(code) = &output.code {
            if args.stdout {
                print!("{}", code);
            } else if args.diff {
                let diff = TextDiff::from_lines(source.as_str(), code.as_str());
                print!(
                    "{}",
                    diff.unified_diff()
                        .context_radius(3)
                        .header(&filename, &format!("{} (lowered)", filename))
                );
            } else {
                let target = output_path(file, &args.input, &out_dir);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::write(&target, code)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                written.push(target);
            }
        }

        all_diagnostics.extend(output.diagnostics);
    }

    emit_diagnostics(&all_diagnostics, &cache, format, use_color)?;

    match format {
        OutputFormat::Text if !quiet => {
            for path in &written {
                eprintln!("  wrote {}", path.display());
            }
            let lowered = files.len() - failed_units;
            if use_color {
                eprintln!(
                    "{} {} of {} file(s)",
                    console::style("Lowered").green().bold(),
                    lowered,
                    files.len()
                );
            } else {
                eprintln!("Lowered {} of {} file(s)", lowered, files.len());
            }
        }
        OutputFormat::Text => {}
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": failed_units == 0,
                "files": files.len(),
                "failed": failed_units,
                "written": written.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    if failed_units > 0 {
        Err(anyhow!("{} file(s) could not be lowered", failed_units))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_mirrors_tree() {
        let path = output_path(
            Path::new("src/ui/button.js"),
            Path::new("src"),
            Path::new("dist"),
        );
        assert_eq!(path, PathBuf::from("dist/ui/button.js"));
    }
}
