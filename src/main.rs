use anyhow::{anyhow, Context, Result as AnyhowResult};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::thread;
use trace_tree::config::TraceViewConfig;
use trace_tree::services::tracing_setup;
use trace_tree::services::ui_queue::UiQueue;
use trace_tree::trace::{TraceEvent, TraceRouter};
use trace_tree::view::trace_tree::{HeadlessTree, TracePopulator};

/// Replay an agent trace into a lazily populated tree and print it
#[derive(Parser, Debug)]
#[command(name = "trace-tree")]
#[command(about = "Replay a JSON-lines agent trace into a trace tree", long_about = None)]
#[command(version)]
struct Args {
    /// Trace file with one JSON event per line. Reads stdin when omitted or "-".
    #[arg(value_name = "TRACE")]
    trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Create sub-rows immediately instead of on expansion
    #[arg(long)]
    no_cache: bool,

    /// Expand rows as the trace is created
    #[arg(long)]
    auto_expand: bool,

    /// Spaces of indentation per subgoal level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Which rows to expand before printing
    #[arg(long, value_enum, default_value_t = ExpandMode::None)]
    expand: ExpandMode,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExpandMode {
    /// Leave every row collapsed
    None,
    /// Expand one page from the top
    Page,
    /// Expand every row
    All,
}

fn load_config(args: &Args) -> AnyhowResult<TraceViewConfig> {
    let mut config = match &args.config {
        Some(path) => TraceViewConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TraceViewConfig::default(),
    };

    if args.no_cache {
        config.cache_sub_text = false;
    }
    if args.auto_expand {
        config.auto_expand = true;
    }
    if let Some(indent) = args.indent {
        config.indent_size = indent;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_trace(path: Option<&Path>) -> AnyhowResult<Box<dyn BufRead + Send>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open trace {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Parse events and hand them to the router. Runs on the producer thread.
fn replay(reader: Box<dyn BufRead + Send>, router: &TraceRouter) -> AnyhowResult<usize> {
    let mut posted = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read trace")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: TraceEvent = serde_json::from_str(&line)
            .with_context(|| format!("Invalid trace event on line {}", index + 1))?;
        if router.dispatch(&event) {
            posted += 1;
        }
    }
    Ok(posted)
}

/// Output for the flags that print and exit without replaying.
///
/// The schema does not depend on any configuration, so it is produced before
/// the config is loaded or validated.
fn informational_output(args: &Args) -> AnyhowResult<Option<String>> {
    if args.print_schema {
        return Ok(Some(TraceViewConfig::json_schema()?));
    }
    if args.dump_config {
        return Ok(Some(load_config(args)?.to_json_pretty()?));
    }
    Ok(None)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if let Some(output) = informational_output(&args)? {
        println!("{}", output);
        return Ok(());
    }

    let config = load_config(&args)?;

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    if let Err(e) = tracing_setup::init_global(&log_file) {
        eprintln!("Failed to open log file {}: {}", log_file.display(), e);
    }
    tracing::info!("trace-tree starting, config: {:?}", config);

    let (queue, sender) = UiQueue::new();
    let router = TraceRouter::from_config(&config, sender);
    let reader = open_trace(args.trace.as_deref())?;
    let producer = thread::spawn(move || replay(reader, &router));

    let mut populator = TracePopulator::from_config(HeadlessTree::new(), &config);
    let applied = queue.drain_blocking(&mut populator);
    let posted = producer
        .join()
        .map_err(|_| anyhow!("Trace producer thread panicked"))??;
    tracing::info!("Replayed {} events, applied {} updates", posted, applied);

    let materialized = match args.expand {
        ExpandMode::None => 0,
        ExpandMode::Page => populator.expand_page(true),
        ExpandMode::All => populator.set_all_expanded(true),
    };
    tracing::debug!("Expansion created {} rows", materialized);

    let rendered = populator.render();
    if !rendered.is_empty() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", rendered).context("Failed to write tree")?;
    }

    Ok(())
}
