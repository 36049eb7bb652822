// crates/phishfuzz-extract/src/lexical.rs
//
// Lexical URL features: everything derivable from the URL string alone.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::error::ExtractError;

/// Known URL-shortener domains, as regex alternatives.
const SHORTENERS: &[&str] = &[
    r"bit\.ly", r"goo\.gl", r"shorte\.st", r"go2l\.ink", r"x\.co", r"ow\.ly", r"t\.co",
    r"tinyurl\.com", r"tr\.im", r"is\.gd", r"cli\.gs", r"yfrog\.com", r"migre\.me",
    r"ff\.im", r"tiny\.cc", r"url4\.eu", r"twit\.ac", r"su\.pr", r"twurl\.nl",
    r"snipurl\.com", r"short\.to", r"budurl\.com", r"ping\.fm", r"post\.ly", r"just\.as",
    r"bkite\.com", r"snipr\.com", r"fic\.kr", r"loopt\.us", r"doiop\.com", r"short\.ie",
    r"kl\.am", r"wp\.me", r"rubyurl\.com", r"om\.ly", r"to\.ly", r"bit\.do", r"t\.ly",
    r"cutt\.ly", r"u\.to", r"v\.gd", r"qr\.ae", r"adf\.ly", r"bitly\.com", r"cur\.lv",
    r"ity\.im", r"q\.gs", r"po\.st", r"bc\.vc", r"twitthis\.com", r"u\.bb", r"yourls\.org",
    r"prettylinkpro\.com", r"scrnch\.me", r"filoops\.info", r"vzturl\.com", r"qr\.net",
    r"1url\.com", r"tweez\.me", r"link\.zip\.net",
];

/// Top-level domains disproportionately used by throwaway phishing hosts.
const SUSPICIOUS_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "xyz", "top", "club", "click", "work", "support", "fit",
    "loan", "download", "men", "review", "date", "party", "trade", "stream", "gdn", "win",
    "accountant", "science", "racing", "buzz", "icu", "wang", "live", "host", "info",
];

/// Features computed from the URL text without any network access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalFeatures {
    /// Characters in the URL as submitted.
    pub url_length: u32,
    /// Non-empty path segments.
    pub url_depth: u32,
    /// Dots in the host.
    pub dots: u32,
    /// Punycode host + '@' in URL + dotted IPv4 host.
    pub symbols: u32,
    /// ASCII digits anywhere in the URL.
    pub num_count: u32,
    pub https: bool,
    pub tld: bool,
    pub tinyurl: bool,
    pub prefix_suffix: bool,
}

/// Compiled lexical feature extractor. Build once, reuse.
#[derive(Debug, Clone)]
pub struct LexicalExtractor {
    shortener: Regex,
    suspicious_tlds: HashSet<&'static str>,
}

impl LexicalExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        // Anchored on the host so "microsoft.com" does not match "t.co".
        let pattern = format!(r"(?i)(^|\.)({})$", SHORTENERS.join("|"));
        Ok(Self {
            shortener: Regex::new(&pattern)?,
            suspicious_tlds: SUSPICIOUS_TLDS.iter().copied().collect(),
        })
    }

    /// Parse `raw` (adding `http://` if it has no scheme) and compute its
    /// lexical features.
    pub fn extract(&self, raw: &str) -> Result<LexicalFeatures, ExtractError> {
        let raw = raw.trim();
        let url = parse_lenient(raw)?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ExtractError::MissingHost(raw.to_string()))?
            .to_ascii_lowercase();

        let url_depth = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).count())
            .unwrap_or(0);

        let is_ip = matches!(url.host(), Some(Host::Ipv4(_)));
        let symbols = [host.starts_with("xn--"), raw.contains('@'), is_ip]
            .iter()
            .filter(|&&hit| hit)
            .count();

        let tld = !is_ip
            && host
                .rsplit('.')
                .next()
                .map(|label| self.suspicious_tlds.contains(label))
                .unwrap_or(false);

        Ok(LexicalFeatures {
            url_length: saturating_u32(raw.chars().count()),
            url_depth: saturating_u32(url_depth),
            dots: saturating_u32(host.matches('.').count()),
            symbols: saturating_u32(symbols),
            num_count: saturating_u32(raw.chars().filter(|c| c.is_ascii_digit()).count()),
            https: url.scheme() == "https",
            tld,
            tinyurl: self.shortener.is_match(&host),
            // The parsed host is IDNA-encoded; "xn--" must not count as a hyphen.
            prefix_suffix: typed_host(raw).contains('-'),
        })
    }
}

fn parse_lenient(raw: &str) -> Result<Url, ExtractError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Url::parse(&format!("http://{raw}"))?),
        Err(e) => Err(e.into()),
    }
}

/// Host as written in `raw`: the authority without userinfo or port, before
/// any IDNA encoding.
fn typed_host(raw: &str) -> &str {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    match host_port.strip_prefix('[') {
        Some(v6) => v6.split(']').next().unwrap_or(v6),
        None => host_port.split(':').next().unwrap_or(host_port),
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
