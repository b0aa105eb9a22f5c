mod report;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use compass_core::{KnowledgeBase, RuleCatalog, UserPreferences};
use compass_eval::{RuleSet, RuleStatistics};
use serde::Serialize;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Text style for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportOutputFormat {
    Terminal,
    Markdown,
}

impl From<ReportOutputFormat> for report::ReportFormat {
    fn from(format: ReportOutputFormat) -> Self {
        match format {
            ReportOutputFormat::Terminal => report::ReportFormat::Terminal,
            ReportOutputFormat::Markdown => report::ReportFormat::Markdown,
        }
    }
}

/// Rule-based travel destination recommender.
#[derive(Parser)]
#[command(name = "compass", version, about = "Rule-based travel destination recommender")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Knowledge base and catalog overrides shared by the evaluating commands.
#[derive(clap::Args)]
struct Sources {
    /// Knowledge base JSON file (default: built-in reference knowledge base)
    #[arg(long)]
    kb: Option<PathBuf>,
    /// Rule catalog JSON file (default: built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank destinations for a preference profile
    Recommend {
        /// Preference profile (.toml, otherwise JSON)
        profile: PathBuf,
        #[command(flatten)]
        sources: Sources,
        /// Append the reasoning trace
        #[arg(long)]
        trace: bool,
        /// Report style (terminal or markdown)
        #[arg(long, default_value = "terminal")]
        format: ReportOutputFormat,
    },

    /// Print the reasoning trace for a preference profile
    Trace {
        /// Preference profile (.toml, otherwise JSON)
        profile: PathBuf,
        #[command(flatten)]
        sources: Sources,
        /// Report style (terminal or markdown)
        #[arg(long, default_value = "terminal")]
        format: ReportOutputFormat,
    },

    /// Rule firing statistics for a preference profile
    Stats {
        /// Preference profile (.toml, otherwise JSON)
        profile: PathBuf,
        #[command(flatten)]
        sources: Sources,
        /// Report style (terminal or markdown)
        #[arg(long, default_value = "terminal")]
        format: ReportOutputFormat,
    },

    /// List the rule table
    Rules {
        /// Rule catalog JSON file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Report style (terminal or markdown)
        #[arg(long, default_value = "terminal")]
        format: ReportOutputFormat,
    },

    /// Validate a knowledge base file against the JSON Schema
    Validate {
        /// Path to the knowledge base JSON file
        kb: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Recommend {
            profile,
            sources,
            trace,
            format,
        } => {
            cmd_recommend(&profile, &sources, trace, format, cli.output, cli.quiet);
        }
        Commands::Trace {
            profile,
            sources,
            format,
        } => {
            cmd_trace(&profile, &sources, format, cli.output, cli.quiet);
        }
        Commands::Stats {
            profile,
            sources,
            format,
        } => {
            cmd_stats(&profile, &sources, format, cli.output, cli.quiet);
        }
        Commands::Rules { catalog, format } => {
            cmd_rules(catalog.as_deref(), format, cli.output, cli.quiet);
        }
        Commands::Validate { kb } => {
            cmd_validate(&kb, cli.output, cli.quiet);
        }
    }
}

// ──────────────────────────────────────────────
// Input loading
// ──────────────────────────────────────────────

fn read_file(path: &Path, what: &str, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading {} '{}': {}", what, path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn load_profile(path: &Path, output: OutputFormat, quiet: bool) -> UserPreferences {
    let text = read_file(path, "profile", output, quiet);
    let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
    let parsed = if is_toml {
        UserPreferences::from_toml_str(&text)
    } else {
        UserPreferences::from_json_str(&text)
    };
    match parsed {
        Ok(prefs) => prefs,
        Err(e) => {
            let msg = format!("error in profile '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn load_kb(path: Option<&Path>, output: OutputFormat, quiet: bool) -> KnowledgeBase {
    let loaded = match path {
        Some(p) => KnowledgeBase::from_json_str(&read_file(p, "knowledge base", output, quiet)),
        None => KnowledgeBase::reference(),
    };
    match loaded {
        Ok(kb) => kb,
        Err(e) => {
            let origin = path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
            let msg = format!("error in knowledge base '{}': {}", origin, e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn load_catalog(path: Option<&Path>, output: OutputFormat, quiet: bool) -> RuleCatalog {
    let loaded = match path {
        Some(p) => RuleCatalog::from_json_str(&read_file(p, "catalog", output, quiet)),
        None => RuleCatalog::reference(),
    };
    match loaded {
        Ok(catalog) => catalog,
        Err(e) => {
            let origin = path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
            let msg = format!("error in catalog '{}': {}", origin, e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn load_rules(output: OutputFormat, quiet: bool) -> RuleSet {
    match RuleSet::standard() {
        Ok(rules) => rules,
        Err(e) => {
            let msg = format!("internal error: invalid rule table: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn json_text<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("error serializing output: {}", e))
}

fn print_json<T: Serialize>(value: &T, output: OutputFormat, quiet: bool) {
    match json_text(value) {
        Ok(text) => println!("{}", text),
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

// ──────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────

fn cmd_recommend(
    profile: &Path,
    sources: &Sources,
    show_trace: bool,
    format: ReportOutputFormat,
    output: OutputFormat,
    quiet: bool,
) {
    let prefs = load_profile(profile, output, quiet);
    let kb = load_kb(sources.kb.as_deref(), output, quiet);
    let catalog = load_catalog(sources.catalog.as_deref(), output, quiet);
    let rules = load_rules(output, quiet);

    let rec = compass_eval::recommend(&kb, &prefs, &rules, &catalog);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            print!(
                "{}",
                report::render_recommendation(&rec, &kb, &catalog, format.into(), show_trace)
            );
        }
        OutputFormat::Json => {
            print_json(
                &report::recommendation_json(&rec, &kb, &catalog, show_trace),
                output,
                quiet,
            );
        }
    }
}

fn cmd_trace(
    profile: &Path,
    sources: &Sources,
    format: ReportOutputFormat,
    output: OutputFormat,
    quiet: bool,
) {
    let prefs = load_profile(profile, output, quiet);
    let kb = load_kb(sources.kb.as_deref(), output, quiet);
    let catalog = load_catalog(sources.catalog.as_deref(), output, quiet);
    let rules = load_rules(output, quiet);

    let store = compass_eval::infer(&kb, &prefs, &rules);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => print!("{}", report::render_trace(&store, &catalog, format.into())),
        OutputFormat::Json => print_json(&report::trace_json(&store, &catalog), output, quiet),
    }
}

fn cmd_stats(
    profile: &Path,
    sources: &Sources,
    format: ReportOutputFormat,
    output: OutputFormat,
    quiet: bool,
) {
    let prefs = load_profile(profile, output, quiet);
    let kb = load_kb(sources.kb.as_deref(), output, quiet);
    let catalog = load_catalog(sources.catalog.as_deref(), output, quiet);
    let rules = load_rules(output, quiet);

    let store = compass_eval::infer(&kb, &prefs, &rules);
    let stats = RuleStatistics::collect(&store, &catalog);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => print!("{}", report::render_stats(&stats, format.into())),
        OutputFormat::Json => print_json(&stats, output, quiet),
    }
}

fn cmd_rules(
    catalog_path: Option<&Path>,
    format: ReportOutputFormat,
    output: OutputFormat,
    quiet: bool,
) {
    let catalog = load_catalog(catalog_path, output, quiet);
    let rules = load_rules(output, quiet);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => print!("{}", report::render_rules(&rules, &catalog, format.into())),
        OutputFormat::Json => print_json(&report::rules_json(&rules, &catalog), output, quiet),
    }
}

static KB_SCHEMA_STR: &str = include_str!("../../../docs/knowledge-base-schema.json");

fn cmd_validate(kb_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(KB_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!(
                "internal error: failed to parse embedded knowledge base schema: {}",
                e
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = read_file(kb_path, "knowledge base", output, quiet);
    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", kb_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();

    // Cross-references are checked only once the shape is right.
    let mut destinations = 0;
    if errors.is_empty() {
        match KnowledgeBase::from_json_value(doc) {
            Ok(kb) => destinations = kb.destinations().len(),
            Err(e) => errors.push(e.to_string()),
        }
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid ({} destinations)", destinations),
                OutputFormat::Json => {
                    println!("{{\"valid\": true, \"destinations\": {}}}", destinations)
                }
            }
        }
    } else {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid knowledge base");
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                eprintln!("{:#}", json);
            }
        }
        process::exit(1);
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
