// crates/phishfuzz-core/src/ruleset.rs
//
// Hand-authored variables and rule bases for phishing URL risk.
//
// Two versions exist. V1 fuzzifies URL length alongside the structural
// counts. V2 drops URL length and adds crisp flag variables (HTTPS,
// shortener, suspicious TLD, hyphenated host, final URL differs). V2 is the
// default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::features::FeatureKey;
use crate::rules::{Antecedent, Rule, RuleBase};
use crate::variable::{FuzzyVariable, Universe, VariableRegistry};

/// Name of the output variable.
pub const RISK: &str = "risk";

/// Which rule base to score with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleBaseVersion {
    /// Length-aware legacy rules.
    V1,
    /// Flag-aware rules.
    #[default]
    V2,
}

impl RuleBaseVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleBaseVersion::V1 => "v1",
            RuleBaseVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for RuleBaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleBaseVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" | "legacy" => Ok(RuleBaseVersion::V1),
            "v2" | "2" | "canonical" => Ok(RuleBaseVersion::V2),
            other => Err(format!("unknown rule base version: {other} (expected v1 or v2)")),
        }
    }
}

/// Build the variable registry used by `version`.
pub fn registry(version: RuleBaseVersion) -> Result<VariableRegistry, FuzzyError> {
    let mut registry = VariableRegistry::new();
    for variable in numeric_variables(version)? {
        registry.define_variable(variable)?;
    }
    if version == RuleBaseVersion::V2 {
        for (name, key) in [
            ("https", FeatureKey::Https),
            ("tinyurl", FeatureKey::Tinyurl),
            ("prefix_suffix", FeatureKey::PrefixSuffix),
            ("tld", FeatureKey::Tld),
            ("final_differs", FeatureKey::FinalDiffers),
        ] {
            registry.define_variable(flag_variable(name, key)?)?;
        }
    }
    registry.define_variable(risk_variable()?)?;
    Ok(registry)
}

/// Build the rule base for `version`.
pub fn rule_base(version: RuleBaseVersion) -> RuleBase {
    let rules = match version {
        RuleBaseVersion::V1 => v1_rules(),
        RuleBaseVersion::V2 => v2_rules(),
    };
    RuleBase::new(&format!("phishing-risk/{version}"), RISK, rules)
}

fn numeric_variables(version: RuleBaseVersion) -> Result<Vec<FuzzyVariable>, FuzzyError> {
    let mut vars = Vec::new();

    if version == RuleBaseVersion::V1 {
        vars.push(
            FuzzyVariable::input("url_length", FeatureKey::UrlLength, Universe::integer(0, 100)?)
                .with_triangle("short", 0.0, 0.0, 50.0)?
                .with_triangle("medium", 30.0, 60.0, 90.0)?
                .with_triangle("long", 70.0, 100.0, 100.0)?,
        );
    }

    vars.push(
        FuzzyVariable::input("url_depth", FeatureKey::UrlDepth, Universe::integer(0, 9)?)
            .with_triangle("shallow", 0.0, 0.0, 3.0)?
            .with_triangle("medium", 2.0, 4.0, 6.0)?
            .with_triangle("deep", 5.0, 9.0, 9.0)?,
    );
    vars.push(
        FuzzyVariable::input("dots", FeatureKey::Dots, Universe::integer(0, 9)?)
            .with_triangle("few", 0.0, 0.0, 3.0)?
            .with_triangle("many", 2.0, 5.0, 9.0)?,
    );
    vars.push(
        FuzzyVariable::input("symbols", FeatureKey::Symbols, Universe::integer(0, 3)?)
            .with_triangle("none", 0.0, 0.0, 1.0)?
            .with_triangle("some", 1.0, 2.0, 3.0)?
            .with_triangle("many", 2.0, 3.0, 3.0)?,
    );
    vars.push(
        FuzzyVariable::input("redirects", FeatureKey::Redirects, Universe::integer(0, 4)?)
            .with_triangle("low", 0.0, 0.0, 2.0)?
            .with_triangle("high", 2.0, 4.0, 4.0)?,
    );
    vars.push(
        FuzzyVariable::input("domain_age", FeatureKey::DomainAge, Universe::integer(0, 1000)?)
            .with_triangle("young", 0.0, 0.0, 180.0)?
            .with_triangle("old", 180.0, 1000.0, 1000.0)?,
    );
    vars.push(
        FuzzyVariable::input("domain_end", FeatureKey::DomainEnd, Universe::integer(0, 365)?)
            .with_triangle("soon", 0.0, 0.0, 30.0)?
            .with_triangle("far", 30.0, 365.0, 365.0)?,
    );
    vars.push(
        FuzzyVariable::input("num_count", FeatureKey::NumCount, Universe::integer(0, 14)?)
            .with_triangle("low", 0.0, 0.0, 3.0)?
            .with_triangle("high", 3.0, 10.0, 14.0)?,
    );

    Ok(vars)
}

/// A crisp yes/no variable over {0, 1}.
fn flag_variable(name: &str, key: FeatureKey) -> Result<FuzzyVariable, FuzzyError> {
    FuzzyVariable::input(name, key, Universe::integer(0, 1)?)
        .with_triangle("no", 0.0, 0.0, 0.0)?
        .with_triangle("yes", 1.0, 1.0, 1.0)
}

fn risk_variable() -> Result<FuzzyVariable, FuzzyError> {
    FuzzyVariable::output(RISK, Universe::integer(0, 100)?)
        .with_triangle("low", 0.0, 0.0, 30.0)?
        .with_triangle("medium", 20.0, 50.0, 70.0)?
        .with_triangle("high", 60.0, 100.0, 100.0)
}

fn is(variable: &str, term: &str) -> Antecedent {
    Antecedent::is(variable, term)
}

fn v1_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            is("url_length", "long")
                .or(is("dots", "many"))
                .or(is("num_count", "high")),
            "high",
        ),
        Rule::new(is("symbols", "many").or(is("redirects", "high")), "high"),
        Rule::new(is("domain_age", "young").or(is("domain_end", "soon")), "high"),
        Rule::new(is("url_depth", "deep").and(is("dots", "many")), "medium"),
        Rule::new(
            is("url_length", "short")
                .and(is("symbols", "none"))
                .and(is("redirects", "low"))
                .and(is("domain_age", "old")),
            "low",
        ),
    ]
}

fn v2_rules() -> Vec<Rule> {
    vec![
        Rule::new(is("dots", "many").or(is("num_count", "high")), "high"),
        Rule::new(is("symbols", "many").or(is("redirects", "high")), "high"),
        Rule::new(is("domain_age", "young").or(is("domain_end", "soon")), "high"),
        Rule::new(is("url_depth", "deep").and(is("dots", "many")), "medium"),
        Rule::new(is("tinyurl", "yes").or(is("tld", "yes")), "high"),
        Rule::new(
            is("https", "no").and(is("prefix_suffix", "yes").or(is("final_differs", "yes"))),
            "high",
        ),
        Rule::new(is("prefix_suffix", "yes").and(is("https", "yes")), "medium"),
        Rule::new(is("final_differs", "yes").and(is("redirects", "low")), "medium"),
        Rule::new(is("symbols", "some").or(is("url_depth", "medium")), "medium"),
        Rule::new(
            is("url_depth", "shallow")
                .and(is("symbols", "none"))
                .and(is("redirects", "low"))
                .and(is("domain_age", "old"))
                .and(is("https", "yes")),
            "low",
        ),
        Rule::new(
            is("tinyurl", "no")
                .and(is("tld", "no"))
                .and(is("domain_end", "far"))
                .and(is("dots", "few")),
            "low",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_versions_validate_against_their_registry() {
        for version in [RuleBaseVersion::V1, RuleBaseVersion::V2] {
            let registry = registry(version).unwrap();
            rule_base(version).validate(&registry).unwrap();
        }
    }

    #[test]
    fn v1_rules_do_not_validate_against_v2_registry() {
        let registry = registry(RuleBaseVersion::V2).unwrap();
        assert!(matches!(
            rule_base(RuleBaseVersion::V1).validate(&registry),
            Err(FuzzyError::UnknownVariable(_))
        ));
    }

    #[test]
    fn v2_has_flags_and_no_length() {
        let registry = registry(RuleBaseVersion::V2).unwrap();
        assert!(registry.variable("https").is_ok());
        assert!(registry.variable("url_length").is_err());
        assert_eq!(rule_base(RuleBaseVersion::V2).len(), 11);
        assert_eq!(rule_base(RuleBaseVersion::V1).len(), 5);
    }

    #[test]
    fn version_parsing() {
        assert_eq!("v1".parse::<RuleBaseVersion>().unwrap(), RuleBaseVersion::V1);
        assert_eq!("V2".parse::<RuleBaseVersion>().unwrap(), RuleBaseVersion::V2);
        assert!("v3".parse::<RuleBaseVersion>().is_err());
        assert_eq!(RuleBaseVersion::default(), RuleBaseVersion::V2);
    }

    #[test]
    fn versions_have_distinct_fingerprints() {
        assert_ne!(
            rule_base(RuleBaseVersion::V1).fingerprint(),
            rule_base(RuleBaseVersion::V2).fingerprint()
        );
    }
}
