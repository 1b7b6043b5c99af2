mod cli;
mod printer;

use std::io::{self, Read};

use anyhow::{anyhow, bail, Context, Result};
use is_terminal::IsTerminal;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use printer::{MarkdownPrinter, TextPrinter};
use ranalysis::{
    config::Config,
    fields::{self, FieldTable, Series},
    state::{RememberedState, StateStore},
    utils, Catalog, Inputs, Rscript,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    // CLI overrides config
    let mut cfg = Config::load();
    if let Some(entry) = &args.entry {
        cfg.set("ENTRY_FUNCTION", entry.clone());
    }
    if let Some(program) = &args.rscript {
        cfg.set("RSCRIPT_PATH", program.clone());
    }
    if let Some(secs) = args.timeout {
        cfg.set("EXECUTION_TIMEOUT", secs.to_string());
    }

    let store = StateStore::from_config(&cfg);
    let remember = cfg.get_bool("REMEMBER_STATE");
    if args.forget {
        store.clear();
    }
    let mut remembered = if remember && !args.forget {
        store.read()
    } else {
        RememberedState::default()
    };

    let color = if args.no_color {
        None
    } else if args.color || io::stdout().is_terminal() {
        cfg.get("DEFAULT_COLOR")
    } else {
        None
    };
    let text = TextPrinter { color };

    let analysis_dir = args
        .analysis_dir
        .clone()
        .or_else(|| cfg.analysis_directory())
        .or_else(|| remembered.analysis_dir.clone());

    if args.forget && !args.list && !args.fields && args.analysis.is_none() {
        println!("Forgot remembered data file and analysis directory");
        return Ok(());
    }
    if !args.list && !args.fields && args.analysis.is_none() && analysis_dir.is_none() {
        bail!("Nothing to do: pass an ANALYSIS, --list or --fields (see --help)");
    }

    let catalog = match &analysis_dir {
        Some(dir) => Catalog::scan(dir, &cfg.entry_function(), &cfg.script_extension())
            .with_context(|| format!("scanning analysis directory {}", dir.display()))?,
        None if args.list || args.analysis.is_some() => {
            bail!("No analysis directory: pass --analysis-dir or set ANALYSIS_DIRECTORY")
        }
        None => Catalog::default(),
    };

    if args.list || (!args.fields && args.analysis.is_none()) {
        text.print_catalog(&catalog);
    }

    if args.fields || args.analysis.is_some() {
        let data = load_data(&args, &remembered)?;
        let table = fields::parse(data.as_deref().unwrap_or(""));
        if table.is_ragged() {
            warn!(fields = table.len(), "rows have different widths; fields have unequal lengths");
        }
        if args.fields {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                text.print_fields(&table);
            }
        }

        if let Some(name) = &args.analysis {
            let analysis = catalog.get(name).ok_or_else(|| {
                anyhow!(
                    "Analysis `{}` not found in {} (available: {})",
                    name,
                    catalog.directory().display(),
                    catalog.names().join(", ")
                )
            })?;
            let inputs = build_inputs(&table, &args.bind, &args.set)?;
            let runtime = Rscript::from_config(&cfg);
            let results = analysis
                .run(&runtime, &inputs)
                .await
                .map_err(|e| anyhow!("{}: {}", e.kind(), e))?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if args.md {
                MarkdownPrinter::default().print_results(&results);
            } else {
                text.print_results(&results);
            }
        }
    }

    if remember {
        if let Some(data) = &args.data {
            remembered.data_file = Some(data.clone());
        }
        if let Some(dir) = &args.analysis_dir {
            remembered.analysis_dir = Some(dir.clone());
        }
        if let Err(e) = store.write(&remembered) {
            warn!(error = %e, "could not remember selections");
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("RANALYSIS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("ranalysis=info"),
        2 => EnvFilter::new("ranalysis=debug"),
        _ => EnvFilter::new("ranalysis=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Explicit data file, then piped stdin, then the remembered data file.
///
/// Blank stdin (`</dev/null`, cron, CI runners) counts as no input.
fn load_data(args: &cli::Cli, remembered: &RememberedState) -> Result<Option<String>> {
    if let Some(path) = &args.data {
        return utils::read_data_file(path);
    }
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading data from stdin")?;
        if !buf.trim().is_empty() {
            return Ok(Some(buf));
        }
        debug!("stdin is empty, trying the remembered data file");
    }
    match &remembered.data_file {
        Some(path) => utils::read_data_file(path),
        None => Ok(None),
    }
}

fn build_inputs(table: &FieldTable, binds: &[String], sets: &[String]) -> Result<Inputs> {
    let mut inputs = Inputs::new();
    for raw in binds {
        let (param, selector) = cli::split_binding(raw)
            .ok_or_else(|| anyhow!("Invalid --bind `{}`, expected PARAM=FIELD", raw))?;
        let field = table.resolve(selector).ok_or_else(|| {
            if table.is_empty() {
                anyhow!("No data loaded; cannot bind `{}` to `{}`", param, selector)
            } else {
                anyhow!(
                    "Unknown field `{}` (available: {})",
                    selector,
                    table.names().join(", ")
                )
            }
        })?;
        if inputs.insert(param.to_string(), field.series.clone()).is_some() {
            bail!("Parameter `{}` is bound more than once", param);
        }
    }
    for raw in sets {
        let (param, values) = cli::split_binding(raw)
            .ok_or_else(|| anyhow!("Invalid --set `{}`, expected PARAM=VALUES", raw))?;
        if inputs.insert(param.to_string(), Series::parse_tokens(values)).is_some() {
            bail!("Parameter `{}` is bound more than once", param);
        }
    }
    Ok(inputs)
}
