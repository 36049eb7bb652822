// crates/phishfuzz-core/src/features.rs
//
// Feature Record: the fixed-schema input handed to the inference engine.
//
// Values are computed by an external collaborator (see phishfuzz-extract).
// The record is typed, so a record built in Rust can never lack a key; the
// dynamic constructors surface MissingFeatureKey for map/JSON input.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// Every key a Feature Record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    UrlLength,
    UrlDepth,
    Dots,
    Symbols,
    Redirects,
    DomainAge,
    DomainEnd,
    NumCount,
    Https,
    Tinyurl,
    PrefixSuffix,
    Tld,
    FinalDiffers,
}

/// Broad value class of a feature, used for input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Non-negative integer (lengths, counts).
    Count,
    /// Integer number of days; negative means "already past".
    Days,
    /// 0 or 1.
    Flag,
}

impl FeatureKey {
    /// All keys in schema order.
    pub const ALL: [FeatureKey; 13] = [
        FeatureKey::UrlLength,
        FeatureKey::UrlDepth,
        FeatureKey::Dots,
        FeatureKey::Symbols,
        FeatureKey::Redirects,
        FeatureKey::DomainAge,
        FeatureKey::DomainEnd,
        FeatureKey::NumCount,
        FeatureKey::Https,
        FeatureKey::Tinyurl,
        FeatureKey::PrefixSuffix,
        FeatureKey::Tld,
        FeatureKey::FinalDiffers,
    ];

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::UrlLength => "url_length",
            FeatureKey::UrlDepth => "url_depth",
            FeatureKey::Dots => "dots",
            FeatureKey::Symbols => "symbols",
            FeatureKey::Redirects => "redirects",
            FeatureKey::DomainAge => "domain_age",
            FeatureKey::DomainEnd => "domain_end",
            FeatureKey::NumCount => "num_count",
            FeatureKey::Https => "https",
            FeatureKey::Tinyurl => "tinyurl",
            FeatureKey::PrefixSuffix => "prefix_suffix",
            FeatureKey::Tld => "tld",
            FeatureKey::FinalDiffers => "final_differs",
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureKey::DomainAge | FeatureKey::DomainEnd => FeatureKind::Days,
            FeatureKey::Https
            | FeatureKey::Tinyurl
            | FeatureKey::PrefixSuffix
            | FeatureKey::Tld
            | FeatureKey::FinalDiffers => FeatureKind::Flag,
            _ => FeatureKind::Count,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| FuzzyError::UnknownVariable(s.to_string()))
    }
}

/// One URL's already-computed lexical and network features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Characters in the full URL.
    pub url_length: u32,
    /// Non-empty path segments.
    pub url_depth: u32,
    /// Dots in the host.
    pub dots: u32,
    /// Punycode host + '@' present + IP-literal host.
    pub symbols: u32,
    /// Redirect hops observed when fetching the URL.
    pub redirects: u32,
    /// Days since domain registration.
    pub domain_age: i64,
    /// Days until domain expiry; negative if already expired.
    pub domain_end: i64,
    /// ASCII digits in the URL.
    pub num_count: u32,
    pub https: bool,
    /// Host matches a known URL-shortener service.
    pub tinyurl: bool,
    /// Hyphen in the host.
    pub prefix_suffix: bool,
    /// Top-level domain is on the suspicious list.
    pub tld: bool,
    /// Final URL after redirects differs from the submitted one.
    pub final_differs: bool,
}

impl FeatureRecord {
    /// Read any feature as a crisp number (flags as 0.0/1.0).
    pub fn value(&self, key: FeatureKey) -> f64 {
        match key {
            FeatureKey::UrlLength => self.url_length as f64,
            FeatureKey::UrlDepth => self.url_depth as f64,
            FeatureKey::Dots => self.dots as f64,
            FeatureKey::Symbols => self.symbols as f64,
            FeatureKey::Redirects => self.redirects as f64,
            FeatureKey::DomainAge => self.domain_age as f64,
            FeatureKey::DomainEnd => self.domain_end as f64,
            FeatureKey::NumCount => self.num_count as f64,
            FeatureKey::Https => flag(self.https),
            FeatureKey::Tinyurl => flag(self.tinyurl),
            FeatureKey::PrefixSuffix => flag(self.prefix_suffix),
            FeatureKey::Tld => flag(self.tld),
            FeatureKey::FinalDiffers => flag(self.final_differs),
        }
    }

    /// Build a record from a dynamic key -> number map.
    ///
    /// Every schema key must be present. Unknown extra keys are ignored.
    pub fn from_values(values: &BTreeMap<String, f64>) -> Result<Self, FuzzyError> {
        Self::from_values_for(values, &FeatureKey::ALL)
    }

    /// Build a record where only `required` keys must be present.
    ///
    /// Absent keys outside `required` read as 0. Every key that is present is
    /// validated, required or not.
    pub fn from_values_for(
        values: &BTreeMap<String, f64>,
        required: &[FeatureKey],
    ) -> Result<Self, FuzzyError> {
        let get = |key: FeatureKey| -> Result<f64, FuzzyError> {
            match values.get(key.as_str()) {
                Some(&raw) => validate(key, raw),
                None if required.contains(&key) => {
                    Err(FuzzyError::MissingFeatureKey(key.as_str().to_string()))
                }
                None => Ok(0.0),
            }
        };

        Ok(Self {
            url_length: get(FeatureKey::UrlLength)? as u32,
            url_depth: get(FeatureKey::UrlDepth)? as u32,
            dots: get(FeatureKey::Dots)? as u32,
            symbols: get(FeatureKey::Symbols)? as u32,
            redirects: get(FeatureKey::Redirects)? as u32,
            domain_age: get(FeatureKey::DomainAge)? as i64,
            domain_end: get(FeatureKey::DomainEnd)? as i64,
            num_count: get(FeatureKey::NumCount)? as u32,
            https: get(FeatureKey::Https)? == 1.0,
            tinyurl: get(FeatureKey::Tinyurl)? == 1.0,
            prefix_suffix: get(FeatureKey::PrefixSuffix)? == 1.0,
            tld: get(FeatureKey::Tld)? == 1.0,
            final_differs: get(FeatureKey::FinalDiffers)? == 1.0,
        })
    }

    /// Parse a JSON object of key -> number into a record.
    pub fn from_json(json: &str) -> Result<Self, FuzzyError> {
        Self::from_json_for(json, &FeatureKey::ALL)
    }

    /// Parse a JSON object where only `required` keys must be present.
    pub fn from_json_for(json: &str, required: &[FeatureKey]) -> Result<Self, FuzzyError> {
        let values: BTreeMap<String, f64> = serde_json::from_str(json)?;
        Self::from_values_for(&values, required)
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Check a raw number against its key's kind and return it unchanged.
fn validate(key: FeatureKey, raw: f64) -> Result<f64, FuzzyError> {
    let invalid = |reason: &str| FuzzyError::InvalidFeatureValue {
        key: key.as_str().to_string(),
        value: raw,
        reason: reason.to_string(),
    };

    if !raw.is_finite() {
        return Err(invalid("must be finite"));
    }
    if raw.fract() != 0.0 {
        return Err(invalid("must be an integer"));
    }

    match key.kind() {
        FeatureKind::Count => {
            if raw < 0.0 {
                return Err(invalid("counts cannot be negative"));
            }
            if raw > u32::MAX as f64 {
                return Err(invalid("count out of range"));
            }
        }
        FeatureKind::Days => {
            if raw.abs() > i64::MAX as f64 {
                return Err(invalid("day count out of range"));
            }
        }
        FeatureKind::Flag => {
            if raw != 0.0 && raw != 1.0 {
                return Err(invalid("flags must be 0 or 1"));
            }
        }
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> BTreeMap<String, f64> {
        FeatureKey::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), 0.0))
            .collect()
    }

    #[test]
    fn key_names_round_trip_through_from_str() {
        for key in FeatureKey::ALL {
            assert_eq!(key.as_str().parse::<FeatureKey>().unwrap(), key);
        }
        assert!("url_len".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn from_values_reports_first_missing_key() {
        let mut map = full_map();
        map.remove("domain_end");
        let err = FeatureRecord::from_values(&map).unwrap_err();
        match err {
            FuzzyError::MissingFeatureKey(key) => assert_eq!(key, "domain_end"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_days_are_accepted() {
        let mut map = full_map();
        map.insert("domain_end".to_string(), -12.0);
        let record = FeatureRecord::from_values(&map).unwrap();
        assert_eq!(record.domain_end, -12);
        assert_eq!(record.value(FeatureKey::DomainEnd), -12.0);
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut map = full_map();
        map.insert("dots".to_string(), -1.0);
        let err = FeatureRecord::from_values(&map).unwrap_err();
        assert!(matches!(err, FuzzyError::InvalidFeatureValue { .. }));
    }

    #[test]
    fn flag_other_than_zero_or_one_is_rejected() {
        let mut map = full_map();
        map.insert("https".to_string(), 2.0);
        assert!(FeatureRecord::from_values(&map).is_err());
    }

    #[test]
    fn fractional_count_is_rejected() {
        let mut map = full_map();
        map.insert("url_depth".to_string(), 1.5);
        assert!(FeatureRecord::from_values(&map).is_err());
    }

    #[test]
    fn flags_read_back_as_zero_or_one() {
        let mut map = full_map();
        map.insert("tinyurl".to_string(), 1.0);
        let record = FeatureRecord::from_values(&map).unwrap();
        assert!(record.tinyurl);
        assert_eq!(record.value(FeatureKey::Tinyurl), 1.0);
        assert_eq!(record.value(FeatureKey::Tld), 0.0);
    }

    #[test]
    fn from_json_parses_full_object() {
        let json = r#"{
            "url_length": 42, "url_depth": 2, "dots": 1, "symbols": 0,
            "redirects": 0, "domain_age": 900, "domain_end": 300,
            "num_count": 3, "https": 1, "tinyurl": 0, "prefix_suffix": 0,
            "tld": 0, "final_differs": 0
        }"#;
        let record = FeatureRecord::from_json(json).unwrap();
        assert_eq!(record.url_length, 42);
        assert_eq!(record.domain_age, 900);
        assert!(record.https);
    }

    #[test]
    fn unrequired_keys_may_be_absent() {
        let mut map = full_map();
        map.remove("url_length");
        map.remove("tld");
        let record = FeatureRecord::from_values_for(&map, &[FeatureKey::Tld]);
        assert!(matches!(record, Err(FuzzyError::MissingFeatureKey(ref k)) if k == "tld"));

        map.insert("tld".to_string(), 1.0);
        let record = FeatureRecord::from_values_for(&map, &[FeatureKey::Tld]).unwrap();
        assert_eq!(record.url_length, 0);
        assert!(record.tld);
    }

    #[test]
    fn present_unrequired_keys_are_still_validated() {
        let mut map = full_map();
        map.insert("url_length".to_string(), -3.0);
        assert!(FeatureRecord::from_values_for(&map, &[FeatureKey::Dots]).is_err());
    }

    #[test]
    fn from_json_missing_key_surfaces_missing_feature_key() {
        let err = FeatureRecord::from_json(r#"{"url_length": 42}"#).unwrap_err();
        assert!(matches!(err, FuzzyError::MissingFeatureKey(_)));
    }
}
