use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use log::{debug, info, LevelFilter};

use crate::classify;
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::input::{self, InputFormat, ReportInput};
use crate::output::{self, OutputFormat, OutputRecord};
use crate::parser::{self, SectionKind};
use crate::render::ReportView;

const LOG_ENV: &str = "FAULTVIEW_LOG";

#[derive(Clone, Debug)]
pub(crate) struct RunConfig {
    input_path: Option<PathBuf>,
    input_format: InputFormat,
    output_path: Option<PathBuf>,
    output_format: OutputFormat,
    sections: Vec<SectionKind>,
    classify: bool,
    color: bool,
    no_color: bool,
    verbose: u8,
}

fn log_kv(label: &str, value: &str) {
    debug!(":: {:<10}: {}", label, value);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::default()
        .filter_level(level)
        .parse_env(env_logger::Env::default().filter(LOG_ENV))
        .target(env_logger::Target::Stderr)
        .try_init();
}

pub(crate) fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };
    let classify = args.classify.or(cfg.classify).unwrap_or(false);

    let input_format_raw = args
        .input_format
        .or(cfg.input_format)
        .unwrap_or_else(|| "auto".to_string());
    let input_format = InputFormat::parse(&input_format_raw)
        .ok_or_else(|| format!("invalid input format '{input_format_raw}'"))?;

    let output_path = args.output.or(cfg.output);
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => {
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output format '{raw}'"))?
        }
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let sections = match (args.sections, cfg.sections) {
        (Some(raw), _) => crate::utils::parse_kinds_csv(&raw)?,
        (None, Some(list)) if !list.is_empty() => crate::utils::parse_kinds_csv(&list.join(","))
            .map_err(|e| format!("invalid sections in config: {e}"))?,
        _ => Vec::new(),
    };

    Ok(RunConfig {
        input_path: args.input.map(|p| config::expand_tilde(&p)),
        input_format,
        output_path: output_path.map(|p| config::expand_tilde(&p)),
        output_format,
        sections,
        classify,
        color: args.color,
        no_color,
        verbose: args.verbose,
    })
}

pub(crate) fn build_record(report: ReportInput, run: &RunConfig) -> OutputRecord {
    let parsed = parser::parse(&report.raw);
    if parsed.is_empty() {
        info!(
            "no section markers in report {}, using verbatim view",
            report.id.map(|id| id.to_string()).unwrap_or_default()
        );
    }
    let mut view = ReportView::from_parsed(&report.raw, &parsed);
    view.retain_kinds(&run.sections);

    let classification = run.classify.then(|| classify::classify(&report.raw));
    let mut record = OutputRecord::new(report.id, report.title, report.priority, view);
    record.ai_analyzed = report.ai_analyzed;
    record.classification = classification;
    record
}

/// `--color` forces escapes on everywhere. Otherwise `--no-color` and text
/// written to a file are plain, and anything else is left to `colored`.
pub(crate) fn color_override(run: &RunConfig) -> Option<bool> {
    if run.color {
        return Some(true);
    }
    if run.no_color || (run.output_path.is_some() && run.output_format == OutputFormat::Text) {
        return Some(false);
    }
    None
}

fn run(run: RunConfig) -> Result<(), String> {
    if let Some(enabled) = color_override(&run) {
        colored::control::set_override(enabled);
    }

    log_kv(
        "Input",
        &run
            .input_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string()),
    );
    log_kv("Format", &format!("{:?}", run.input_format));
    log_kv("Output", &format!("{:?}", run.output_format));
    log_kv("Sections", &crate::utils::format_kinds(&run.sections));
    log_kv("Classify", if run.classify { "true" } else { "false" });

    let contents = input::read_source(run.input_path.as_deref()).map_err(|e| e.to_string())?;
    let reports = input::load_reports(&contents, run.input_format).map_err(|e| e.to_string())?;
    info!("loaded {} report(s)", reports.len());

    let records: Vec<OutputRecord> = reports
        .into_iter()
        .map(|report| build_record(report, &run))
        .collect();

    match run.output_path.as_deref() {
        Some(path) => {
            let bytes = output::render(run.output_format, &records);
            output::write_output(path, &bytes).map_err(|e| e.to_string())?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
            if run.verbose > 0 {
                println!(
                    ":: {} :: {} report(s) written to {} ::",
                    "Completed".green(),
                    records.len(),
                    path.display()
                );
            }
        }
        None => {
            let bytes = output::render(run.output_format, &records);
            print!("{}", String::from_utf8_lossy(&bytes));
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                let mut cmd = CliArgs::command();
                print!("{}", cmd.render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    if args.init_config {
        let path = config::default_config_path()
            .ok_or_else(|| "unable to locate home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!(":: wrote default config to {} ::", path.display());
        } else {
            println!(":: config already exists at {} ::", path.display());
        }
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run_cfg = build_run_config(args, cfg)?;
    run(run_cfg)
}
