// crates/phishfuzz-core/src/rules.rs
//
// Rule Base: fuzzy IF-THEN rules over linguistic terms.
//
// Antecedents are expression trees combining (variable, term) leaves with
// fuzzy AND (min) and fuzzy OR (max). Every rule implies one term of the
// output variable. Rules carry no priority; each contributes to its
// consequent's aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::FuzzyError;
use crate::features::FeatureRecord;
use crate::variable::VariableRegistry;

/// The "if" side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Antecedent {
    /// `variable is term`.
    Is { variable: String, term: String },
    /// Fuzzy AND (minimum) of all children. Empty evaluates to 1.
    And(Vec<Antecedent>),
    /// Fuzzy OR (maximum) of all children. Empty evaluates to 0.
    Or(Vec<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: &str, term: &str) -> Self {
        Antecedent::Is {
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }

    /// `self AND other`, flattening nested ANDs.
    pub fn and(self, other: Antecedent) -> Self {
        match self {
            Antecedent::And(mut children) => {
                children.push(other);
                Antecedent::And(children)
            }
            first => Antecedent::And(vec![first, other]),
        }
    }

    /// `self OR other`, flattening nested ORs.
    pub fn or(self, other: Antecedent) -> Self {
        match self {
            Antecedent::Or(mut children) => {
                children.push(other);
                Antecedent::Or(children)
            }
            first => Antecedent::Or(vec![first, other]),
        }
    }

    /// Evaluate the tree, resolving each leaf through `degree`.
    pub fn evaluate<F>(&self, degree: &F) -> Result<f64, FuzzyError>
    where
        F: Fn(&str, &str) -> Result<f64, FuzzyError>,
    {
        match self {
            Antecedent::Is { variable, term } => degree(variable, term),
            Antecedent::And(children) => children
                .iter()
                .try_fold(1.0_f64, |acc, child| -> Result<f64, FuzzyError> {
                    Ok(acc.min(child.evaluate(degree)?))
                }),
            Antecedent::Or(children) => children
                .iter()
                .try_fold(0.0_f64, |acc, child| -> Result<f64, FuzzyError> {
                    Ok(acc.max(child.evaluate(degree)?))
                }),
        }
    }

    /// Every (variable, term) leaf, left to right.
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Antecedent::Is { variable, term } => out.push((variable.as_str(), term.as_str())),
            Antecedent::And(children) | Antecedent::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antecedent::Is { variable, term } => write!(f, "{variable} is {term}"),
            Antecedent::And(children) => write_group(f, children, "AND"),
            Antecedent::Or(children) => write_group(f, children, "OR"),
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, children: &[Antecedent], op: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        match child {
            Antecedent::Is { .. } => write!(f, "{child}")?,
            _ => write!(f, "({child})")?,
        }
    }
    Ok(())
}

/// One fuzzy rule: IF antecedent THEN output is consequent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: Antecedent,
    /// Term of the output variable this rule implies.
    pub consequent: String,
}

impl Rule {
    pub fn new(antecedent: Antecedent, consequent: &str) -> Self {
        Self {
            antecedent,
            consequent: consequent.to_string(),
        }
    }

    /// Firing strength of this rule for `record`, in [0, 1].
    pub fn evaluate(
        &self,
        record: &FeatureRecord,
        registry: &VariableRegistry,
    ) -> Result<f64, FuzzyError> {
        self.antecedent
            .evaluate(&|variable: &str, term: &str| registry.fuzzify(variable, term, record))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {}", self.antecedent, self.consequent)
    }
}

/// A named, immutable set of rules targeting one output variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBase {
    name: String,
    output: String,
    rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new(name: &str, output: &str, rules: Vec<Rule>) -> Self {
        Self {
            name: name.to_string(),
            output: output.to_string(),
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the output variable every consequent belongs to.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every leaf and consequent against `registry`.
    ///
    /// Leaves must name input variables and their terms; consequents must be
    /// terms of the output variable.
    pub fn validate(&self, registry: &VariableRegistry) -> Result<(), FuzzyError> {
        let output = registry.variable(&self.output)?;
        if output.source().is_some() {
            return Err(FuzzyError::UnknownVariable(format!(
                "{} is an input variable, not an output",
                self.output
            )));
        }

        for rule in &self.rules {
            for (variable, term) in rule.antecedent.leaves() {
                let var = registry.variable(variable)?;
                if var.source().is_none() {
                    return Err(FuzzyError::UnknownVariable(format!(
                        "{variable} is not an input variable"
                    )));
                }
                var.term(term)?;
            }
            output.term(&rule.consequent)?;
        }

        Ok(())
    }

    /// SHA-256 of the canonical rendering, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(b"\n");
        for rule in &self.rules {
            let line = format!(
                "IF {} THEN {} is {}\n",
                rule.antecedent, self.output, rule.consequent
            );
            hasher.update(line.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}
