// crates/phishfuzz-core/src/engine.rs
//
// Mamdani max-min inference with centroid defuzzification.
//
// An engine owns one validated registry and rule base. Construction is the
// only fallible configuration step; evaluation allocates only call-local
// buffers and holds no mutable state, so a shared engine can score records
// from any number of threads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::features::{FeatureKey, FeatureRecord};
use crate::rules::RuleBase;
use crate::ruleset::{self, RuleBaseVersion};
use crate::score::{self, Assessment};
use crate::variable::VariableRegistry;

/// Firing strength of one rule for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFiring {
    /// Position of the rule in its rule base.
    pub index: usize,
    /// Rendered rule, e.g. "IF dots is many THEN high".
    pub rule: String,
    pub consequent: String,
    pub strength: f64,
}

/// Aggregated (max) firing strength of all rules implying one output term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStrength {
    pub term: String,
    pub strength: f64,
}

/// Membership degrees of one input variable for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzifiedInput {
    pub variable: String,
    pub feature: FeatureKey,
    /// Feature value after clipping into the variable's universe.
    pub crisp: f64,
    /// (term, degree) in the variable's term order.
    pub degrees: Vec<(String, f64)>,
}

/// Full result of one inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Centroid of the aggregate output set, on the output universe scale.
    pub crisp_risk: f64,
    pub firings: Vec<RuleFiring>,
    pub term_strengths: Vec<TermStrength>,
}

/// A validated registry + rule base pair, built once and evaluated many times.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    registry: VariableRegistry,
    rule_base: RuleBase,
    fingerprint: String,
    /// Input variables the rule base reads, in first-reference order.
    inputs: Vec<String>,
}

impl InferenceEngine {
    /// Build an engine, failing fast if the rule base references anything the
    /// registry does not define.
    pub fn new(registry: VariableRegistry, rule_base: RuleBase) -> Result<Self, FuzzyError> {
        rule_base.validate(&registry)?;

        let mut inputs: Vec<String> = Vec::new();
        for rule in rule_base.rules() {
            for (variable, _) in rule.antecedent.leaves() {
                if !inputs.iter().any(|v| v == variable) {
                    inputs.push(variable.to_string());
                }
            }
        }

        let fingerprint = rule_base.fingerprint();
        tracing::info!(
            "Inference engine ready: rule base {} ({} rules, {} inputs, fingerprint {})",
            rule_base.name(),
            rule_base.len(),
            inputs.len(),
            &fingerprint[..12]
        );

        Ok(Self {
            registry,
            rule_base,
            fingerprint,
            inputs,
        })
    }

    /// Engine over the built-in variables and rules of `version`.
    pub fn standard(version: RuleBaseVersion) -> Result<Self, FuzzyError> {
        Self::new(ruleset::registry(version)?, ruleset::rule_base(version))
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Feature keys the rule base reads, in schema order.
    pub fn required_features(&self) -> Vec<FeatureKey> {
        let mut keys: Vec<FeatureKey> = self
            .inputs
            .iter()
            .filter_map(|name| self.registry.variable(name).ok())
            .filter_map(|var| var.source())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Membership of every relevant input in each of its terms.
    pub fn fuzzify(&self, record: &FeatureRecord) -> Result<Vec<FuzzifiedInput>, FuzzyError> {
        let mut out = Vec::with_capacity(self.inputs.len());
        for name in &self.inputs {
            let var = self.registry.variable(name)?;
            let feature = var
                .source()
                .ok_or_else(|| FuzzyError::UnknownVariable(name.clone()))?;
            let crisp = var.universe().clip(record.value(feature));
            let degrees = var
                .terms()
                .iter()
                .map(|(term, triangle)| (term.clone(), triangle.membership(crisp)))
                .collect();
            out.push(FuzzifiedInput {
                variable: name.clone(),
                feature,
                crisp,
                degrees,
            });
        }
        Ok(out)
    }

    /// Crisp risk on the output universe scale (0-100 for the built-in rules).
    pub fn infer(&self, record: &FeatureRecord) -> Result<f64, FuzzyError> {
        Ok(self.explain(record)?.crisp_risk)
    }

    /// Run inference and keep the per-rule and per-term intermediate values.
    pub fn explain(&self, record: &FeatureRecord) -> Result<Inference, FuzzyError> {
        let output = self.registry.variable(self.rule_base.output())?;

        // Rule evaluation.
        let mut firings = Vec::with_capacity(self.rule_base.len());
        for (index, rule) in self.rule_base.rules().iter().enumerate() {
            let strength = rule.evaluate(record, &self.registry)?;
            tracing::debug!("rule {} fired at {:.4}: {}", index, strength, rule);
            firings.push(RuleFiring {
                index,
                rule: rule.to_string(),
                consequent: rule.consequent.clone(),
                strength,
            });
        }

        // Max-aggregate firing strengths per consequent term.
        let term_strengths: Vec<TermStrength> = output
            .terms()
            .iter()
            .map(|(term, _)| TermStrength {
                term: term.clone(),
                strength: firings
                    .iter()
                    .filter(|f| &f.consequent == term)
                    .fold(0.0_f64, |acc, f| acc.max(f.strength)),
            })
            .collect();

        // Clip each term at its strength, union pointwise, take the centroid.
        let universe = output.universe();
        let mut numerator = 0.0_f64;
        let mut denominator = 0.0_f64;
        for i in 0..universe.sample_count() {
            let x = universe.point(i);
            let mu = output
                .terms()
                .iter()
                .zip(&term_strengths)
                .fold(0.0_f64, |acc, ((_, triangle), ts)| {
                    acc.max(triangle.membership(x).min(ts.strength))
                });
            numerator += x * mu;
            denominator += mu;
        }

        if denominator <= 0.0 {
            tracing::debug!("no rule fired for record {:?}", record);
            return Err(FuzzyError::NoRuleFired);
        }

        let crisp_risk = universe.clip(numerator / denominator);
        tracing::debug!(
            "aggregate {:?} -> crisp risk {:.4}",
            term_strengths
                .iter()
                .map(|t| (t.term.as_str(), t.strength))
                .collect::<Vec<_>>(),
            crisp_risk
        );

        Ok(Inference {
            crisp_risk,
            firings,
            term_strengths,
        })
    }

    /// Score, classify, and echo the inputs used.
    pub fn assess(&self, record: &FeatureRecord) -> Result<Assessment, FuzzyError> {
        Ok(self.assess_explained(record)?.0)
    }

    /// `assess` plus the intermediate values of the same single inference.
    pub fn assess_explained(
        &self,
        record: &FeatureRecord,
    ) -> Result<(Assessment, Inference), FuzzyError> {
        let inference = self.explain(record)?;
        let breakdown: BTreeMap<FeatureKey, f64> = self
            .required_features()
            .into_iter()
            .map(|key| (key, record.value(key)))
            .collect();
        let assessment = score::assessment(
            inference.crisp_risk,
            breakdown,
            self.rule_base.name(),
            &self.fingerprint,
        );
        Ok((assessment, inference))
    }

    /// Build a record from a key -> number map, requiring only the keys this
    /// rule base reads.
    pub fn record_from_values(
        &self,
        values: &BTreeMap<String, f64>,
    ) -> Result<FeatureRecord, FuzzyError> {
        FeatureRecord::from_values_for(values, &self.required_features())
    }

    /// JSON counterpart of `record_from_values`.
    pub fn record_from_json(&self, json: &str) -> Result<FeatureRecord, FuzzyError> {
        FeatureRecord::from_json_for(json, &self.required_features())
    }
}
