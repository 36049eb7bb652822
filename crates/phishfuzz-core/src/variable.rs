// crates/phishfuzz-core/src/variable.rs
//
// Fuzzy Variable Registry: bounded numeric universes partitioned into
// overlapping linguistic terms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::features::{FeatureKey, FeatureRecord};
use crate::membership::Triangle;

/// A bounded, discretized numeric range [min, max] sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, FuzzyError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(FuzzyError::InvalidUniverse(
                "bounds and step must be finite".to_string(),
            ));
        }
        if min >= max {
            return Err(FuzzyError::InvalidUniverse(format!(
                "min {min} must be below max {max}"
            )));
        }
        if step <= 0.0 {
            return Err(FuzzyError::InvalidUniverse(format!(
                "step {step} must be positive"
            )));
        }
        Ok(Self { min, max, step })
    }

    /// Unit-step universe over [min, max].
    pub fn integer(min: i64, max: i64) -> Result<Self, FuzzyError> {
        Self::new(min as f64, max as f64, 1.0)
    }

    /// Number of sample points, including both ends when `step` divides the range.
    pub fn sample_count(&self) -> usize {
        ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1
    }

    /// The i-th sample point. Computed from the index to avoid drift.
    pub fn point(&self, i: usize) -> f64 {
        self.min + self.step * i as f64
    }

    /// Every sample point in ascending order.
    pub fn points(&self) -> Vec<f64> {
        (0..self.sample_count()).map(|i| self.point(i)).collect()
    }

    /// Clamp a crisp value into [min, max].
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

/// A named fuzzy variable: a universe plus its linguistic terms.
///
/// Input variables are bound to the Feature Record key they read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyVariable {
    name: String,
    universe: Universe,
    source: Option<FeatureKey>,
    /// Terms in definition order.
    terms: Vec<(String, Triangle)>,
}

impl FuzzyVariable {
    /// An input variable fed by `source`.
    pub fn input(name: &str, source: FeatureKey, universe: Universe) -> Self {
        Self {
            name: name.to_string(),
            universe,
            source: Some(source),
            terms: Vec::new(),
        }
    }

    /// An output variable (no feature source).
    pub fn output(name: &str, universe: Universe) -> Self {
        Self {
            name: name.to_string(),
            universe,
            source: None,
            terms: Vec::new(),
        }
    }

    /// Add a named term. Term names must be unique within the variable.
    pub fn with_term(mut self, term: &str, triangle: Triangle) -> Result<Self, FuzzyError> {
        if self.terms.iter().any(|(name, _)| name == term) {
            return Err(FuzzyError::DuplicateTerm {
                variable: self.name.clone(),
                term: term.to_string(),
            });
        }
        self.terms.push((term.to_string(), triangle));
        Ok(self)
    }

    /// Shorthand for `with_term(term, Triangle::new(a, b, c)?)`.
    pub fn with_triangle(self, term: &str, a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        let triangle = Triangle::new(a, b, c).map_err(|e| match e {
            FuzzyError::InvalidMembership { reason, .. } => FuzzyError::InvalidMembership {
                term: format!("{}.{}", self.name, term),
                reason,
            },
            other => other,
        })?;
        self.with_term(term, triangle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn source(&self) -> Option<FeatureKey> {
        self.source
    }

    pub fn terms(&self) -> &[(String, Triangle)] {
        &self.terms
    }

    pub fn term(&self, term: &str) -> Result<&Triangle, FuzzyError> {
        self.terms
            .iter()
            .find(|(name, _)| name == term)
            .map(|(_, t)| t)
            .ok_or_else(|| FuzzyError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_string(),
            })
    }

    /// Degree of `value` in `term`, without clipping.
    pub fn membership(&self, term: &str, value: f64) -> Result<f64, FuzzyError> {
        Ok(self.term(term)?.membership(value))
    }
}

/// Registry of every fuzzy variable an engine knows about.
///
/// Built once, then shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableRegistry {
    variables: BTreeMap<String, FuzzyVariable>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable. Names must be unique.
    pub fn define_variable(&mut self, variable: FuzzyVariable) -> Result<(), FuzzyError> {
        if self.variables.contains_key(variable.name()) {
            return Err(FuzzyError::DuplicateVariable(variable.name().to_string()));
        }
        self.variables.insert(variable.name().to_string(), variable);
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Result<&FuzzyVariable, FuzzyError> {
        self.variables
            .get(name)
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_string()))
    }

    /// Degree of `value` in `variable.term`.
    pub fn membership(&self, variable: &str, term: &str, value: f64) -> Result<f64, FuzzyError> {
        self.variable(variable)?.membership(term, value)
    }

    /// Read the variable's source feature from `record`, clip it into the
    /// universe, and return its degree in `term`.
    ///
    /// Fails with `UnknownVariable` if `variable` is not an input variable.
    pub fn fuzzify(
        &self,
        variable: &str,
        term: &str,
        record: &FeatureRecord,
    ) -> Result<f64, FuzzyError> {
        let var = self.variable(variable)?;
        let source = var
            .source()
            .ok_or_else(|| FuzzyError::UnknownVariable(variable.to_string()))?;
        let crisp = var.universe().clip(record.value(source));
        var.membership(term, crisp)
    }

    /// All input variables, in name order.
    pub fn inputs(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.variables.values().filter(|v| v.source().is_some())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_age() -> FuzzyVariable {
        FuzzyVariable::input("domain_age", FeatureKey::DomainAge, Universe::integer(0, 1000).unwrap())
            .with_triangle("young", 0.0, 0.0, 180.0)
            .unwrap()
            .with_triangle("old", 180.0, 1000.0, 1000.0)
            .unwrap()
    }

    fn record_with_age(age: i64) -> FeatureRecord {
        FeatureRecord {
            url_length: 20,
            url_depth: 1,
            dots: 1,
            symbols: 0,
            redirects: 0,
            domain_age: age,
            domain_end: 200,
            num_count: 0,
            https: true,
            tinyurl: false,
            prefix_suffix: false,
            tld: false,
            final_differs: false,
        }
    }

    #[test]
    fn universe_len_includes_both_ends() {
        let u = Universe::integer(0, 100).unwrap();
        assert_eq!(u.sample_count(), 101);
        assert_eq!(u.point(0), 0.0);
        assert_eq!(u.point(100), 100.0);
    }

    #[test]
    fn fractional_step_universe() {
        let u = Universe::new(0.0, 1.0, 0.25).unwrap();
        assert_eq!(u.points(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn invalid_universes_rejected() {
        assert!(Universe::new(5.0, 5.0, 1.0).is_err());
        assert!(Universe::new(0.0, 5.0, 0.0).is_err());
        assert!(Universe::new(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn value_can_belong_to_two_terms() {
        let var = FuzzyVariable::input("x", FeatureKey::DomainAge, Universe::integer(0, 1000).unwrap())
            .with_triangle("young", 0.0, 0.0, 300.0)
            .unwrap()
            .with_triangle("old", 100.0, 1000.0, 1000.0)
            .unwrap();
        let young = var.membership("young", 150.0).unwrap();
        let old = var.membership("old", 150.0).unwrap();
        assert!(young > 0.0 && old > 0.0);
    }

    #[test]
    fn registry_membership_and_unknowns() {
        let mut registry = VariableRegistry::new();
        registry.define_variable(domain_age()).unwrap();

        assert_eq!(registry.membership("domain_age", "young", 0.0).unwrap(), 1.0);
        assert!(matches!(
            registry.membership("age", "young", 0.0),
            Err(FuzzyError::UnknownVariable(_))
        ));
        assert!(matches!(
            registry.membership("domain_age", "ancient", 0.0),
            Err(FuzzyError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn duplicate_variable_and_term_rejected() {
        let mut registry = VariableRegistry::new();
        registry.define_variable(domain_age()).unwrap();
        assert!(matches!(
            registry.define_variable(domain_age()),
            Err(FuzzyError::DuplicateVariable(_))
        ));
        assert!(matches!(
            domain_age().with_triangle("old", 0.0, 1.0, 2.0),
            Err(FuzzyError::DuplicateTerm { .. })
        ));
    }

    #[test]
    fn fuzzify_clips_into_universe() {
        let mut registry = VariableRegistry::new();
        registry.define_variable(domain_age()).unwrap();

        // 5000 days clips to 1000, the peak of "old".
        let degree = registry.fuzzify("domain_age", "old", &record_with_age(5000)).unwrap();
        assert_eq!(degree, 1.0);

        // Negative age clips to 0, the peak of "young".
        let degree = registry.fuzzify("domain_age", "young", &record_with_age(-3)).unwrap();
        assert_eq!(degree, 1.0);
    }

    #[test]
    fn fuzzify_rejects_output_variable() {
        let mut registry = VariableRegistry::new();
        let risk = FuzzyVariable::output("risk", Universe::integer(0, 100).unwrap())
            .with_triangle("low", 0.0, 0.0, 30.0)
            .unwrap();
        registry.define_variable(risk).unwrap();
        assert!(registry.fuzzify("risk", "low", &record_with_age(10)).is_err());
    }

    #[test]
    fn bad_triangle_error_names_term() {
        let err = FuzzyVariable::output("risk", Universe::integer(0, 100).unwrap())
            .with_triangle("low", 30.0, 0.0, 0.0)
            .unwrap_err();
        match err {
            FuzzyError::InvalidMembership { term, .. } => assert_eq!(term, "risk.low"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
