// crates/phishfuzz-extract/src/lib.rs
//
// phishfuzz-extract: turns a URL into a complete phishfuzz-core Feature Record.
//
// Lexical features are computed from the URL text. Network-derived features
// (domain age/expiry, redirects, final URL) are supplied by the caller; any
// that are missing are replaced by documented sentinels. This crate never
// opens a connection.

pub mod error;
pub mod lexical;
pub mod sentinel;

pub use error::ExtractError;
pub use lexical::{LexicalExtractor, LexicalFeatures};
pub use sentinel::{NetworkSignals, ResolvedSignals, Sentinels};

use phishfuzz_core::FeatureRecord;
use serde::{Deserialize, Serialize};

/// A Feature Record plus the provenance of its network fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub url: String,
    pub record: FeatureRecord,
    /// Feature keys whose values are sentinels rather than observations.
    pub substituted: Vec<String>,
}

/// Lexical extractor + sentinel policy.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    lexical: LexicalExtractor,
    sentinels: Sentinels,
}

impl FeatureExtractor {
    pub fn new(sentinels: Sentinels) -> Result<Self, ExtractError> {
        Ok(Self {
            lexical: LexicalExtractor::new()?,
            sentinels,
        })
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    /// Build a complete Feature Record for `url`.
    pub fn extract(&self, url: &str, signals: &NetworkSignals) -> Result<Extraction, ExtractError> {
        let lexical = self.lexical.extract(url)?;
        let network = self.sentinels.resolve(signals);

        tracing::debug!(
            "extracted {}: {:?}, network {:?}",
            url,
            lexical,
            network
        );

        Ok(Extraction {
            url: url.trim().to_string(),
            record: FeatureRecord {
                url_length: lexical.url_length,
                url_depth: lexical.url_depth,
                dots: lexical.dots,
                symbols: lexical.symbols,
                redirects: network.redirect_count,
                domain_age: network.domain_age_days,
                domain_end: network.domain_end_days,
                num_count: lexical.num_count,
                https: lexical.https,
                tinyurl: lexical.tinyurl,
                prefix_suffix: lexical.prefix_suffix,
                tld: lexical.tld,
                final_differs: network.final_url_differs,
            },
            substituted: network.substituted,
        })
    }
}
