use anyhow::{Context, Result};
use clap::Parser;
use math_scratchpad::engine::{render_plain, Scratchpad, Settings};
use math_scratchpad::{interactive, server, ExprEvaluator, TextDocument};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Evaluate scratch documents line by line and align the results.
#[derive(Parser, Debug)]
#[command(name = "math-scratchpad", version, about)]
struct Cli {
    /// Serve the editor protocol on stdin/stdout.
    #[arg(long, visible_alias = "stdio")]
    server: bool,

    /// Scratch file to evaluate; reads lines interactively when omitted.
    file: Option<PathBuf>,

    /// Minimum column annotations start at.
    #[arg(long)]
    align_column: Option<usize>,

    /// Minimum gap between the longest line and the annotations.
    #[arg(long)]
    padding: Option<usize>,

    /// Significant digits in results.
    #[arg(long)]
    precision: Option<usize>,

    /// Evaluate without printing any results.
    #[arg(long)]
    hide_results: bool,

    /// Append the log to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(column) = self.align_column {
            settings.align_column = column;
        }
        if let Some(padding) = self.padding {
            settings.padding = padding;
        }
        if let Some(precision) = self.precision {
            settings.precision = precision;
        }
        settings.show_results = !self.hide_results;
        settings
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    log::debug!("{:?}", cli);

    let settings = cli.settings();

    if cli.server {
        server::run_server_mode(settings)?;
    } else if let Some(path) = &cli.file {
        run_file(path, settings)?;
    } else {
        run_interactive_mode(settings)?;
    }

    Ok(())
}

// stdout is the protocol channel in server mode, so the log never goes there.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    match log_file {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
    Ok(())
}

fn run_file(path: &Path, settings: Settings) -> Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let document = TextDocument::new(&contents);

    let pad = Scratchpad::new(ExprEvaluator::new(), settings);
    let annotations = pad.recompute(&document);
    print!("{}", render_plain(&document, &annotations));
    Ok(())
}

fn run_interactive_mode(settings: Settings) -> Result<()> {
    eprintln!("math-scratchpad: enter expressions, :help for commands");

    let mut pad = Scratchpad::new(ExprEvaluator::new(), settings);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    interactive::run_interactive(&mut pad, stdin.lock(), &mut stdout)?;
    Ok(())
}
