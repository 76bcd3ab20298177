use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;

use vnorm_core::verifier::{Severity, VerificationResult};
use vnorm_core::{codec, normalizer, verifier, Child, NormalizationMode, VNode};

/// vnorm — virtual-node children normalization
///
/// Flatten, merge, and key render-function output stored as JSON.
#[derive(Parser)]
#[command(name = "vnorm", version, about, long_about = None)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log normalization details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize render output into a flat node list
    Normalize {
        /// Path to a JSON render output file
        file: PathBuf,
        /// Normalization strategy
        #[arg(long, value_enum, default_value_t = Mode::Always)]
        mode: Mode,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Normalize and check the result is ready for reconciliation
    Verify {
        /// Path to a JSON render output file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the SHA-256 fingerprint of the normalized output
    Hash {
        /// Path to a JSON render output file
        file: PathBuf,
    },

    /// Print the synthetic key assigned at a nesting path and index
    Keys {
        /// Index of each enclosing list below the root, outermost first
        #[arg(required = true)]
        path: Vec<usize>,
        /// Position of the element within its list
        #[arg(long)]
        index: usize,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Simple,
    Always,
}

impl From<Mode> for NormalizationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Simple => NormalizationMode::Simple,
            Mode::Always => NormalizationMode::Always,
        }
    }
}

// Exit codes: 0 success, 1 verification failure, 2 usage or input error
const EXIT_OK: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Normalize { file, mode, json } => cmd_normalize(&file, mode, json, cli.quiet),
        Commands::Verify { file, json } => cmd_verify(&file, json, cli.quiet),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Keys { path, index } => {
            println!("{}", normalizer::list_key(&path, index));
            EXIT_OK
        }
        Commands::Version => {
            println!(
                "vnorm {} (vnorm-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let fallback_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_normalize(file: &Path, mode: Mode, json: bool, quiet: bool) -> i32 {
    let Some(child) = load(file) else {
        return EXIT_ERROR;
    };

    let normalized = normalizer::normalize_children(mode.into(), into_children(child));

    if json {
        let out = serde_json::Value::Array(normalized.iter().map(codec::encode_child).collect());
        println!("{}", pretty(&out));
    } else {
        for (i, child) in normalized.iter().enumerate() {
            println!("{:>4}  {}", i.to_string().dimmed(), describe(child));
        }
        if !quiet {
            eprintln!("{} {} children", "normalized".green(), normalized.len());
        }
    }
    EXIT_OK
}

fn cmd_verify(file: &Path, json: bool, quiet: bool) -> i32 {
    let Some(child) = load(file) else {
        return EXIT_ERROR;
    };

    let nodes = normalize_deep(child);
    let result = verifier::verify(&nodes);

    if json {
        println!("{}", pretty(&verification_json(&result, nodes.len())));
    } else {
        for diag in &result.diagnostics {
            let line = diag.to_string();
            match diag.severity {
                Severity::Error => eprintln!("{}", line.red()),
                Severity::Warning => eprintln!("{}", line.yellow()),
            }
        }
        if result.is_valid() && !quiet {
            println!("{} {} nodes verified", "✓".green(), nodes.len());
        }
    }

    if result.is_valid() {
        EXIT_OK
    } else {
        EXIT_INVALID
    }
}

fn cmd_hash(file: &Path) -> i32 {
    let Some(child) = load(file) else {
        return EXIT_ERROR;
    };
    println!("{}", normalizer::fingerprint(&normalize_deep(child)));
    EXIT_OK
}

// ── Helpers ───────────────────────────────────────────────

fn load(file: &Path) -> Option<Child> {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            report(&vnorm_core::Error::from(e), file);
            return None;
        }
    };
    match codec::parse_child(&text) {
        Ok(child) => {
            tracing::debug!(file = %file.display(), bytes = text.len(), "loaded render output");
            Some(child)
        }
        Err(e) => {
            report(&e, file);
            None
        }
    }
}

fn report(err: &vnorm_core::Error, file: &Path) {
    eprintln!("{}: {}: {}", "error".red().bold(), file.display(), err);
}

// Top-level documents are a children list; a lone value is a list of one.
fn into_children(child: Child) -> Vec<Child> {
    match child {
        Child::List(list) => list.items,
        other => vec![other],
    }
}

fn normalize_deep(child: Child) -> Vec<VNode> {
    match child {
        Child::Node(node) => vec![node],
        other => vnorm_core::deep_normalize(other).unwrap_or_default(),
    }
}

fn describe(child: &Child) -> String {
    match child {
        Child::Node(node) if node.is_text() => node.to_string().cyan().to_string(),
        Child::Node(node) if node.is_comment => node.to_string().dimmed().to_string(),
        Child::Node(node) => node.to_string(),
        other => codec::encode_child(other).to_string(),
    }
}

fn verification_json(result: &VerificationResult, nodes: usize) -> serde_json::Value {
    let diagnostics: Vec<serde_json::Value> = result
        .diagnostics
        .iter()
        .map(|d| {
            let severity = match d.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            serde_json::json!({
                "severity": severity,
                "kind": d.kind.to_string(),
                "message": d.message,
                "location": d.location,
            })
        })
        .collect();
    serde_json::json!({
        "valid": result.is_valid(),
        "nodes": nodes,
        "errors": result.errors().len(),
        "warnings": result.warnings().len(),
        "diagnostics": diagnostics,
    })
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
