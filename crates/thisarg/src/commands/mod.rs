//! CLI command implementations

pub mod check;
pub mod explain;
pub mod init;
pub mod lower;

use anyhow::Result;
use std::path::{Path, PathBuf};
use thisarg::Config;
use thisarg_diagnostics::{DiagnosticEmitter, Diagnostics, JsonEmitter, SourceCache, TerminalEmitter};
use walkdir::WalkDir;

use crate::OutputFormat;

const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts"];

fn is_source(path: &Path) -> bool {
    let name = path.to_string_lossy();
    if name.ends_with(".d.ts") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Collect input files under `path`, skipping `node_modules` and `skip`
/// (the output directory, so lowered files are not lowered again).
pub fn collect_sources(path: &Path, skip: Option<&Path>) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let skip = skip.and_then(|s| s.canonicalize().ok());
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            let p = entry.path();
            if p.file_name().map_or(false, |n| n == "node_modules") {
                return false;
            }
            match (&skip, p.canonicalize()) {
                (Some(skip), Ok(canonical)) => &canonical != skip,
                _ => true,
            }
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_source(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Explicit `--config`, else the nearest `thisarg.toml` above the input,
/// else defaults.
pub fn load_config(explicit: Option<&Path>, input: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::load(path)?);
    }
    let start = if input.is_file() {
        input.parent().unwrap_or(Path::new("."))
    } else {
        input
    };
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    Ok(Config::discover(&start)?
        .map(|(_, config)| config)
        .unwrap_or_default())
}

/// Render diagnostics to stderr in the selected format.
pub fn emit_diagnostics(
    diagnostics: &Diagnostics,
    cache: &SourceCache,
    format: OutputFormat,
    use_color: bool,
) -> Result<()> {
    let stderr = std::io::stderr();
    match format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(stderr.lock(), use_color);
            emitter.emit_all(diagnostics, cache)?;
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(stderr.lock());
            emitter.emit_all(diagnostics, cache)?;
            emitter.emit_summary(diagnostics)?;
        }
    }
    Ok(())
}
