// crates/phishfuzz-cli/src/commands/eval.rs
//
// `phishfuzz eval <file>`: score a Feature Record given as a JSON object.
//
// The file must contain every feature key the active rule base reads; a
// missing one is reported as an error rather than defaulted.

use std::fs;
use std::io::Read;

use clap::Args;

use super::Context;

/// Score a JSON feature record.
#[derive(Debug, Args)]
pub struct EvalCmd {
    /// Path to a JSON object of feature key -> number, or "-" for stdin.
    #[arg()]
    pub file: String,

    /// Show every rule's firing strength.
    #[arg(long)]
    pub explain: bool,
}

/// Run the eval command.
pub fn run(cmd: &EvalCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let json = if cmd.file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cmd.file)?
    };

    let record = ctx.engine.record_from_json(&json)?;
    tracing::info!("evaluating feature record from {}", cmd.file);

    super::report(ctx, None, &record, Vec::new(), cmd.explain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use phishfuzz_core::{FuzzyError, InferenceEngine, RuleBaseVersion};
    use phishfuzz_extract::Sentinels;

    fn context(version: RuleBaseVersion) -> Context {
        Context {
            engine: InferenceEngine::standard(version).unwrap(),
            sentinels: Sentinels::default(),
            format: OutputFormat::Json,
        }
    }

    fn write_record(name: &str) -> String {
        let path = std::env::temp_dir()
            .join(format!("phishfuzz-{}-{}.json", name, std::process::id()));
        fs::write(
            &path,
            r#"{"url_depth": 0, "dots": 1, "symbols": 0, "redirects": 0,
                "domain_age": 900, "domain_end": 300, "num_count": 0, "https": 1,
                "tinyurl": 0, "prefix_suffix": 0, "tld": 0, "final_differs": 0}"#,
        )
        .unwrap();
        path.display().to_string()
    }

    #[test]
    fn record_without_url_length_evaluates_under_v2() {
        let file = write_record("v2");
        let cmd = EvalCmd {
            file: file.clone(),
            explain: true,
        };
        assert!(run(&cmd, &context(RuleBaseVersion::V2)).is_ok());
        let _ = fs::remove_file(file);
    }

    #[test]
    fn record_without_url_length_is_rejected_under_v1() {
        let file = write_record("v1");
        let cmd = EvalCmd {
            file: file.clone(),
            explain: false,
        };
        let err = run(&cmd, &context(RuleBaseVersion::V1)).unwrap_err();
        let _ = fs::remove_file(file);
        match err.downcast_ref::<FuzzyError>() {
            Some(FuzzyError::MissingFeatureKey(key)) => assert_eq!(key, "url_length"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
