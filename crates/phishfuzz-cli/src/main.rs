// crates/phishfuzz-cli/src/main.rs
//
// CLI entrypoint for phishfuzz, a fuzzy-logic phishing URL risk scorer.
//
// Loads configuration, initializes tracing, builds the inference engine once,
// and dispatches to the scan, eval, and rules subcommands.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use commands::eval::EvalCmd;
use commands::scan::ScanCmd;
use commands::Context;
use config::ScanConfig;
use output::OutputFormat;
use phishfuzz_core::{InferenceEngine, RuleBaseVersion};

/// phishfuzz scores URLs for phishing risk with a fuzzy rule base.
#[derive(Parser, Debug)]
#[command(
    name = "phishfuzz",
    version = "0.1.0",
    about = "Fuzzy-logic phishing risk scoring for URLs"
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Rule base to score with (v1 or v2). Overrides the config file.
    #[arg(long, global = true)]
    rule_base: Option<RuleBaseVersion>,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract features from a URL and assess its risk.
    Scan(ScanCmd),

    /// Assess a feature record read from a JSON file.
    Eval(EvalCmd),

    /// List the active rule base and its fingerprint.
    Rules,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .or_else(|| ScanConfig::default_path().map(|p| p.display().to_string()));
    let explicit = cli.config.is_some();
    let loaded = path.as_deref().map(|p| (p, ScanConfig::load(p)));

    let mut scan_config = match &loaded {
        Some((_, Ok(config))) => config.clone(),
        _ => ScanConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&scan_config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Some((p, Ok(_))) => tracing::info!("Loaded configuration from {}", p),
        // A missing default config is normal; only an explicit path is worth a warning.
        Some((p, Err(e))) if explicit => {
            tracing::warn!("Could not load config from {}: {}. Using defaults.", p, e)
        }
        Some((p, Err(e))) => tracing::debug!("No config at {}: {}", p, e),
        None => tracing::debug!("No config directory on this platform; using defaults"),
    }

    if let Some(version) = cli.rule_base {
        scan_config.rule_base = version;
    }
    let format = if cli.json {
        OutputFormat::Json
    } else {
        scan_config.output.parse::<OutputFormat>()?
    };

    let engine = InferenceEngine::standard(scan_config.rule_base)?;
    let ctx = Context {
        engine,
        sentinels: scan_config.sentinels.clone(),
        format,
    };

    match &cli.command {
        Commands::Scan(cmd) => commands::scan::run(cmd, &ctx)?,
        Commands::Eval(cmd) => commands::eval::run(cmd, &ctx)?,
        Commands::Rules => commands::rules::run(&ctx)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_accepts_negative_expiry() {
        let cli = Cli::try_parse_from([
            "phishfuzz",
            "scan",
            "http://example.com",
            "--domain-end",
            "-12",
            "--final-differs",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(cmd) => {
                assert_eq!(cmd.domain_end, Some(-12));
                assert_eq!(cmd.final_differs, Some(false));
                assert_eq!(cmd.domain_age, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_rule_base_flag_parses() {
        let cli = Cli::try_parse_from(["phishfuzz", "rules", "--rule-base", "v1", "--json"]).unwrap();
        assert_eq!(cli.rule_base, Some(RuleBaseVersion::V1));
        assert!(cli.json);
        assert!(Cli::try_parse_from(["phishfuzz", "rules", "--rule-base", "v7"]).is_err());
    }
}
