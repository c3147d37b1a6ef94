//! `taxalign run|match|sweep|validate`: catalog taxonomy matching.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use taxalign_recon::{
    generate_report, load_catalog, Catalog, Matcher, ReconConfig, ReconError, ReconResult,
    ReconSummary,
};

use crate::exit_codes::{
    EXIT_MATCH_BAD_CATALOG, EXIT_MATCH_INVALID_CONFIG, EXIT_MATCH_RUNTIME, EXIT_USAGE,
};
use crate::CliError;

fn match_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Exit code for an engine error.
fn engine_err(err: ReconError) -> CliError {
    let code = match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidThreshold(_) => EXIT_MATCH_INVALID_CONFIG,
        ReconError::CatalogParse { .. }
        | ReconError::MissingField { .. }
        | ReconError::InvalidField { .. } => EXIT_MATCH_BAD_CATALOG,
        ReconError::Io(_) => EXIT_MATCH_RUNTIME,
    };
    let hint = match err {
        ReconError::InvalidThreshold(_) => Some("use a value between 0.0 and 1.0".to_string()),
        _ => None,
    };
    CliError { code, message: err.to_string(), hint }
}

fn io_err(action: &str, path: &Path, err: std::io::Error) -> CliError {
    engine_err(ReconError::Io(format!("cannot {action} {}: {err}", path.display())))
}

fn read_catalog(path: &Path) -> Result<Catalog, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err("read", path, e))?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let catalog = load_catalog(&label, &text).map_err(engine_err)?;
    debug!(
        "loaded {} ({} categories) from {}",
        catalog.name,
        catalog.categories.len(),
        path.display()
    );
    Ok(catalog)
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str =
        std::fs::read_to_string(config_path).map_err(|e| io_err("read", config_path, e))?;
    ReconConfig::from_toml(&config_str).map_err(engine_err)
}

/// Resolve run-file paths relative to the run file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| io_err("write", path, e))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn summary_line(summary: &ReconSummary) -> String {
    format!(
        "{} category, {} attribute, {} list-of-values matches",
        summary.total_category_matches, summary.total_attribute_matches, summary.total_lov_matches,
    )
}

/// Where and how a result is written.
pub struct OutputOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

fn emit(result: &ReconResult, opts: &OutputOptions) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(result)
        .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("JSON serialization error: {e}")))?;
    let report = generate_report(result);

    if let Some(ref path) = opts.output {
        write_file(path, &json_str)?;
    }
    if let Some(ref path) = opts.report {
        write_file(path, &report)?;
    }

    if opts.json {
        println!("{json_str}");
    } else {
        println!("{report}");
    }

    eprintln!("{}", summary_line(&result.summary));
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_run(config_path: PathBuf, mut opts: OutputOptions) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);

    let source = read_catalog(&base.join(&config.source))?;
    let target = read_catalog(&base.join(&config.target))?;

    let result = taxalign_recon::run(&config, &source, &target).map_err(engine_err)?;

    // Flags win over the run file's [output] table.
    if opts.output.is_none() {
        opts.output = config.output.json.as_ref().map(|p| base.join(p));
    }
    if opts.report.is_none() {
        opts.report = config.output.report.as_ref().map(|p| base.join(p));
    }

    eprintln!("run '{}': {} -> {}", config.name, source.name, target.name);
    emit(&result, &opts)
}

pub fn cmd_match(
    source_path: PathBuf,
    target_path: PathBuf,
    threshold: f64,
    opts: OutputOptions,
) -> Result<(), CliError> {
    let matcher = Matcher::new(threshold).map_err(engine_err)?;
    let source = read_catalog(&source_path)?;
    let target = read_catalog(&target_path)?;
    let result = matcher.match_all(&source, &target);
    emit(&result, &opts)
}

#[derive(Debug, Serialize)]
struct SweepRow {
    similarity_threshold: f64,
    summary: ReconSummary,
}

pub fn cmd_sweep(
    source_path: PathBuf,
    target_path: PathBuf,
    thresholds: Vec<f64>,
    json: bool,
) -> Result<(), CliError> {
    if thresholds.is_empty() {
        return Err(match_err(EXIT_USAGE, "at least one threshold is required"));
    }
    let matchers = thresholds
        .iter()
        .map(|t| Matcher::new(*t))
        .collect::<Result<Vec<_>, _>>()
        .map_err(engine_err)?;

    let source = read_catalog(&source_path)?;
    let target = read_catalog(&target_path)?;

    let rows: Vec<SweepRow> = matchers
        .iter()
        .map(|m| SweepRow {
            similarity_threshold: m.threshold(),
            summary: m.match_all(&source, &target).summary,
        })
        .collect();

    if json {
        let json_str = serde_json::to_string_pretty(&rows)
            .map_err(|e| match_err(EXIT_MATCH_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for row in &rows {
            println!("threshold {:.2}: {}", row.similarity_threshold, summary_line(&row.summary));
        }
    }
    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);
    let source = read_catalog(&base.join(&config.source))?;
    let target = read_catalog(&base.join(&config.target))?;

    eprintln!(
        "valid: '{}': {} ({} categories) vs {} ({} categories), threshold {}",
        config.name,
        source.name,
        source.categories.len(),
        target.name,
        target.categories.len(),
        config.threshold(),
    );
    Ok(())
}
