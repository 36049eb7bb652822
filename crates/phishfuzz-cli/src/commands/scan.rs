// crates/phishfuzz-cli/src/commands/scan.rs
//
// `phishfuzz scan <url>`: extract lexical features from a URL and score it.
//
// Network-derived values are taken from flags when given; the rest fall back
// to the configured sentinels.

use clap::Args;
use phishfuzz_extract::{FeatureExtractor, NetworkSignals};

use super::Context;

/// Score a URL.
#[derive(Debug, Args)]
pub struct ScanCmd {
    /// The URL to assess.
    #[arg()]
    pub url: String,

    /// Days since the domain was registered, if known.
    #[arg(long, allow_hyphen_values = true)]
    pub domain_age: Option<i64>,

    /// Days until the domain expires, if known (negative if already expired).
    #[arg(long, allow_hyphen_values = true)]
    pub domain_end: Option<i64>,

    /// Redirect hops observed when fetching the URL, if known.
    #[arg(long)]
    pub redirects: Option<u32>,

    /// Whether the final URL differs from the submitted one, if known.
    #[arg(long)]
    pub final_differs: Option<bool>,

    /// Show every rule's firing strength.
    #[arg(long)]
    pub explain: bool,
}

/// Run the scan command.
pub fn run(cmd: &ScanCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = FeatureExtractor::new(ctx.sentinels.clone())?;
    let signals = NetworkSignals {
        domain_age_days: cmd.domain_age,
        domain_end_days: cmd.domain_end,
        redirect_count: cmd.redirects,
        final_url_differs: cmd.final_differs,
    };

    let extraction = extractor.extract(&cmd.url, &signals)?;
    tracing::info!(
        "scanning {} ({} sentinel substitutions)",
        extraction.url,
        extraction.substituted.len()
    );

    super::report(
        ctx,
        Some(extraction.url),
        &extraction.record,
        extraction.substituted,
        cmd.explain,
    )
}
