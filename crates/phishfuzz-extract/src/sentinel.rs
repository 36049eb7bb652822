// crates/phishfuzz-extract/src/sentinel.rs
//
// Network-derived signals and the fallback values used when they are
// unavailable.
//
// WHOIS lookups and redirect-following requests happen outside this crate.
// Whatever they produced arrives as NetworkSignals; any field left empty
// (lookup timed out, failed to parse, was never attempted) is replaced by the
// matching sentinel so the engine always receives a complete record.

use serde::{Deserialize, Serialize};

/// Results of network lookups performed by the caller, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSignals {
    /// Days since the domain was registered (WHOIS creation date).
    pub domain_age_days: Option<i64>,
    /// Days until the domain registration expires (WHOIS expiration date).
    pub domain_end_days: Option<i64>,
    /// Redirect hops observed when fetching the URL.
    pub redirect_count: Option<u32>,
    /// Whether the final URL after redirects differs from the submitted one.
    pub final_url_differs: Option<bool>,
}

/// Fallback values substituted for missing network signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinels {
    #[serde(default = "default_domain_days")]
    pub domain_age_days: i64,

    #[serde(default = "default_domain_days")]
    pub domain_end_days: i64,

    /// A failed fetch counts as one redirect.
    #[serde(default = "default_redirect_count")]
    pub redirect_count: u32,

    /// A failed fetch counts as landing somewhere else.
    #[serde(default = "default_final_url_differs")]
    pub final_url_differs: bool,
}

fn default_domain_days() -> i64 {
    250
}

fn default_redirect_count() -> u32 {
    1
}

fn default_final_url_differs() -> bool {
    true
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            domain_age_days: default_domain_days(),
            domain_end_days: default_domain_days(),
            redirect_count: default_redirect_count(),
            final_url_differs: default_final_url_differs(),
        }
    }
}

/// Network signals with every gap filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSignals {
    pub domain_age_days: i64,
    pub domain_end_days: i64,
    pub redirect_count: u32,
    pub final_url_differs: bool,
    /// Names of the signals that were replaced by sentinels.
    pub substituted: Vec<String>,
}

impl Sentinels {
    /// Fill every missing signal with its sentinel, logging each substitution.
    pub fn resolve(&self, signals: &NetworkSignals) -> ResolvedSignals {
        let mut substituted = Vec::new();

        let domain_age_days = fill(
            signals.domain_age_days,
            self.domain_age_days,
            "domain_age",
            &mut substituted,
        );
        let domain_end_days = fill(
            signals.domain_end_days,
            self.domain_end_days,
            "domain_end",
            &mut substituted,
        );
        let redirect_count = fill(
            signals.redirect_count,
            self.redirect_count,
            "redirects",
            &mut substituted,
        );
        let final_url_differs = fill(
            signals.final_url_differs,
            self.final_url_differs,
            "final_differs",
            &mut substituted,
        );

        ResolvedSignals {
            domain_age_days,
            domain_end_days,
            redirect_count,
            final_url_differs,
            substituted,
        }
    }
}

fn fill<T: Copy + std::fmt::Debug>(
    value: Option<T>,
    sentinel: T,
    name: &str,
    substituted: &mut Vec<String>,
) -> T {
    match value {
        Some(v) => v,
        None => {
            tracing::warn!("{} unavailable, substituting sentinel {:?}", name, sentinel);
            substituted.push(name.to_string());
            sentinel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_sentinels() {
        let s = Sentinels::default();
        assert_eq!(s.domain_age_days, 250);
        assert_eq!(s.domain_end_days, 250);
        assert_eq!(s.redirect_count, 1);
        assert!(s.final_url_differs);
    }

    #[test]
    fn empty_signals_take_every_sentinel() {
        let resolved = Sentinels::default().resolve(&NetworkSignals::default());
        assert_eq!(resolved.domain_age_days, 250);
        assert_eq!(resolved.redirect_count, 1);
        assert!(resolved.final_url_differs);
        assert_eq!(
            resolved.substituted,
            vec!["domain_age", "domain_end", "redirects", "final_differs"]
        );
    }

    #[test]
    fn provided_signals_pass_through() {
        let signals = NetworkSignals {
            domain_age_days: Some(4000),
            domain_end_days: Some(-3),
            redirect_count: Some(0),
            final_url_differs: Some(false),
        };
        let resolved = Sentinels::default().resolve(&signals);
        assert_eq!(resolved.domain_age_days, 4000);
        assert_eq!(resolved.domain_end_days, -3);
        assert_eq!(resolved.redirect_count, 0);
        assert!(!resolved.final_url_differs);
        assert!(resolved.substituted.is_empty());
    }

    #[test]
    fn partial_sentinel_table_fills_defaults() {
        let s: Sentinels = toml::from_str("domain_age_days = 30").unwrap();
        assert_eq!(s.domain_age_days, 30);
        assert_eq!(s.domain_end_days, 250);
        assert!(s.final_url_differs);
    }
}
