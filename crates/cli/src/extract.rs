//! `acsx extract`, `acsx validate`, `acsx sheets`.

use std::path::{Path, PathBuf};

use acsx_extract::output::{render, to_cells};
use acsx_extract::summary::{compute_summary, ExtractionSummary};
use acsx_extract::{ExtractConfig, ExtractError, Extraction, GeographyKind, OutputMode};
use acsx_io::{ExportError, LoadError, TableExport};
use serde::Serialize;

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_WARNINGS};
use crate::{CliError, Format};

pub struct ExtractArgs {
    pub config: PathBuf,
    pub input: Option<PathBuf>,
    pub sheet: Option<String>,
    pub format: Format,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct RunMeta<'a> {
    config_name: &'a str,
    geography: GeographyKind,
    engine_version: &'static str,
    run_at: String,
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet: Option<&'a str>,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    meta: RunMeta<'a>,
    summary: &'a ExtractionSummary,
    #[serde(flatten)]
    extraction: &'a Extraction,
}

fn config_err(err: ExtractError) -> CliError {
    CliError::new(EXIT_INVALID_CONFIG, err.to_string())
}

fn load_err(err: LoadError) -> CliError {
    let hint = match &err {
        LoadError::SheetNotFound { .. } => Some("run `acsx sheets <FILE>` to list sheet names"),
        LoadError::UnsupportedFormat(_) => Some("save the sheet as .xlsx or .csv"),
        _ => None,
    };
    let cli_err = CliError::new(EXIT_LOAD, err.to_string());
    match hint {
        Some(h) => cli_err.with_hint(h),
        None => cli_err,
    }
}

fn read_config(path: &Path) -> Result<ExtractConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    ExtractConfig::from_toml(&text).map_err(config_err)
}

/// Relative paths in a config resolve against the config's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_names(config: &ExtractConfig, base: &Path) -> Result<Vec<String>, CliError> {
    match &config.geographies_file {
        Some(file) if config.geography != GeographyKind::State => {
            acsx_io::read_names(&base.join(file)).map_err(load_err)
        }
        _ => Ok(Vec::new()),
    }
}

pub fn cmd_extract(args: ExtractArgs) -> Result<(), CliError> {
    if args.format == Format::Xlsx && args.output.is_none() {
        return Err(CliError::usage("--format xlsx writes a workbook and needs a file")
            .with_hint("add --output FILE.xlsx"));
    }

    let config = read_config(&args.config)?;
    let base = base_dir(&args.config);

    let names = load_names(&config, base)?;
    let plan = config.plan(&names).map_err(config_err)?;

    let input = match (&args.input, &config.source.file) {
        (Some(path), _) => path.clone(),
        (None, Some(file)) => base.join(file),
        (None, None) => {
            return Err(CliError::usage("no input file")
                .with_hint("pass --input FILE or set `file` under [source] in the config"));
        }
    };
    let sheet = args.sheet.as_deref().or(config.source.sheet.as_deref());

    tracing::info!(input = %input.display(), sheet = sheet.unwrap_or("<first>"), "loading input");
    let grid = acsx_io::load_grid(&input, sheet).map_err(load_err)?;

    let extraction = acsx_extract::extract(&grid, &plan);
    let summary = compute_summary(&extraction);

    let rendered = match args.format {
        Format::Tsv => render(&extraction, OutputMode::Tsv, &plan.output),
        Format::Csv => render(&extraction, OutputMode::Csv, &plan.output),
        Format::Json => {
            let out = ExtractOutput {
                meta: RunMeta {
                    config_name: &plan.name,
                    geography: plan.kind,
                    engine_version: env!("CARGO_PKG_VERSION"),
                    run_at: chrono::Utc::now().to_rfc3339(),
                    input: input.display().to_string(),
                    sheet,
                },
                summary: &summary,
                extraction: &extraction,
            };
            let json = serde_json::to_string_pretty(&out)
                .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
            Ok(json)
        }
        Format::Xlsx => {
            let path = args
                .output
                .as_deref()
                .ok_or_else(|| CliError::usage("--format xlsx needs --output"))?;
            let rows = to_cells(&extraction, &plan.output);
            let table = TableExport {
                sheet_name: plan.output.sheet_name_for(plan.kind),
                rows: &rows,
                header: plan.output.header,
                source_note: plan.output.source_note.as_deref(),
            };
            acsx_io::export_table(path, &table).map_err(|e| export_err(path, e))?;
            report(&args, Some(path), &extraction, &summary);
            return strict_check(&args, &summary);
        }
    }
    .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot render output: {e}")))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n")).map_err(|e| {
                CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
            })?;
        }
        None => println!("{rendered}"),
    }

    report(&args, args.output.as_deref(), &extraction, &summary);
    strict_check(&args, &summary)
}

fn export_err(path: &Path, err: ExportError) -> CliError {
    CliError::new(EXIT_ERROR, format!("cannot write {}: {err}", path.display()))
}

/// Summary and warnings on stderr unless quiet.
fn report(args: &ExtractArgs, written: Option<&Path>, extraction: &Extraction, summary: &ExtractionSummary) {
    if args.quiet {
        return;
    }
    if let Some(path) = written {
        eprintln!("wrote {}", path.display());
    }
    eprintln!(
        "{} extraction: {} geographies, {} matched, {} unmatched, {} warning(s)",
        extraction.kind, summary.geographies, summary.matched, summary.unmatched, summary.warnings,
    );
    for warning in &extraction.warnings {
        eprintln!("warning: {warning}");
    }
}

fn strict_check(args: &ExtractArgs, summary: &ExtractionSummary) -> Result<(), CliError> {
    if args.strict && !summary.is_clean() {
        return Err(CliError::new(
            EXIT_WARNINGS,
            format!("{} warning(s) recorded (--strict)", summary.warnings),
        ));
    }
    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    let geographies = match (config.geography, &config.geographies_file) {
        (GeographyKind::State, _) => "all states".to_string(),
        (_, Some(file)) => format!("{} inline + names from {file}", config.geographies.len()),
        (_, None) => format!("{} name(s)", config.geographies.len()),
    };

    eprintln!(
        "valid: {} extraction '{}' ({}) with {} row spec(s), {} percentage(s), {} rank(s)",
        config.geography,
        config.name,
        geographies,
        config.rows.len(),
        config.percentages.len(),
        config.ranks.len(),
    );
    Ok(())
}

pub fn cmd_sheets(file: PathBuf, json: bool) -> Result<(), CliError> {
    let names = acsx_io::list_sheets(&file).map_err(load_err)?;

    if json {
        let out = serde_json::to_string(&names)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
