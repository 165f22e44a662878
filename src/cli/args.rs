use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "faultview",
    version,
    about = "structured viewer for equipment problem AI analysis reports",
    long_about = "Faultview splits the free-text AI analysis attached to an equipment problem record into labeled sections (category, causes, solution, severity, discovery phase, root cause) and renders them as text, JSON, XML or HTML.\n\nExamples:\n  faultview analysis.txt\n  curl -s http://host/api/problems/7 | faultview -I record\n  faultview problems.json -o report.html --sections solution,severity\n\nTip: Use --config to persist output settings."
)]
pub struct CliArgs {
    #[arg(
        value_name = "FILE",
        help_heading = "Input",
        help = "Report text or problem-record JSON to read ('-' or omitted reads stdin)."
    )]
    pub input: Option<String>,

    #[arg(
        short = 'I',
        long = "if",
        visible_alias = "input-format",
        value_name = "FORMAT",
        help_heading = "Input",
        help = "Input format (auto, text, record, records)."
    )]
    pub input_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.faultview/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config file to ~/.faultview/config.yml and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Force colored output, also into files (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write results to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, xml, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 's',
        long = "sec",
        visible_alias = "sections",
        value_name = "LIST",
        help_heading = "Output",
        help = "Only emit these sections (comma-separated, e.g. solution,severity)."
    )]
    pub sections: Option<String>,

    #[arg(
        short = 'k',
        long = "cls",
        visible_alias = "classify",
        num_args = 0..=1,
        default_missing_value = "true",
        help_heading = "Output",
        help = "Attach keyword classification (category, solution, priority, confidence)."
    )]
    pub classify: Option<bool>,
}
