use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "ranalysis", about = "Run R analysis scripts over whitespace-delimited data", version)]
#[command(group(ArgGroup::new("format").args(["md", "json"]).multiple(false)))]
#[command(group(ArgGroup::new("color_switch").args(["color", "no_color"]).multiple(false)))]
pub struct Cli {
    /// Analysis to run (script file name without extension).
    #[arg(value_name = "ANALYSIS")]
    pub analysis: Option<String>,

    /// Data file with one row per line and whitespace-separated columns.
    ///
    /// Without it, piped stdin is used, then the remembered data file.
    /// A file that does not exist loads nothing.
    #[arg(short = 'd', long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Directory containing the analysis scripts.
    #[arg(short = 'a', long = "analysis-dir", value_name = "DIR")]
    pub analysis_dir: Option<PathBuf>,

    /// List available analyses and their parameters.
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Print the parsed fields.
    #[arg(short = 'f', long)]
    pub fields: bool,

    /// Bind a parameter to a parsed field: PARAM=FIELD, where FIELD is "Field N" or N.
    #[arg(short = 'b', long = "bind", value_name = "PARAM=FIELD", action = clap::ArgAction::Append)]
    pub bind: Vec<String>,

    /// Bind a parameter to literal whitespace-separated values: PARAM=VALUES.
    #[arg(short = 's', long = "set", value_name = "PARAM=VALUES", action = clap::ArgAction::Append)]
    pub set: Vec<String>,

    /// Name of the entry function every script declares.
    #[arg(long)]
    pub entry: Option<String>,

    /// Path to the Rscript executable.
    #[arg(long)]
    pub rscript: Option<String>,

    /// Kill the R session after this many seconds (0 disables).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Render results as Markdown.
    #[arg(long)]
    pub md: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Force colored section headers.
    #[arg(long)]
    pub color: bool,
    /// Disable colored section headers.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Forget the remembered data file and analysis directory.
    #[arg(long)]
    pub forget: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Split a `PARAM=VALUE` argument.
pub fn split_binding(raw: &str) -> Option<(&str, &str)> {
    let (param, value) = raw.split_once('=')?;
    let param = param.trim();
    if param.is_empty() {
        return None;
    }
    Some((param, value.trim()))
}
