use crate::cli::args::CliArgs;
use crate::input::InputFormat;
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.input_format.as_deref() {
        InputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --input-format '{raw}', expected auto, text, record, or records")
        })?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --output-format '{raw}', expected text, json, xml, or html")
        })?;
    }
    if let Some(raw) = args.sections.as_deref() {
        crate::utils::parse_kinds_csv(raw).map_err(|e| format!("invalid --sections '{raw}': {e}"))?;
    }
    if let Some(path) = args.output.as_deref() {
        if path.trim().is_empty() {
            return Err("invalid --output, expected a file path".to_string());
        }
    }
    Ok(())
}
