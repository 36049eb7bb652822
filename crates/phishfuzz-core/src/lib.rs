// crates/phishfuzz-core/src/lib.rs
//
// phishfuzz-core: fuzzy-logic phishing risk scoring for URLs.
//
// The crate turns a Feature Record (lexical and network features computed
// elsewhere) into a crisp risk value using Mamdani max-min inference over
// hand-authored triangular membership functions, then normalizes the value
// into a 0-1 score and a verdict. It performs no I/O.
//
// Construct an InferenceEngine once and share it; evaluation is read-only.

pub mod engine;
pub mod error;
pub mod features;
pub mod membership;
pub mod rules;
pub mod ruleset;
pub mod score;
pub mod variable;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use phishfuzz_core::InferenceEngine;`

pub use engine::{FuzzifiedInput, Inference, InferenceEngine, RuleFiring, TermStrength};
pub use error::FuzzyError;
pub use features::{FeatureKey, FeatureKind, FeatureRecord};
pub use membership::Triangle;
pub use rules::{Antecedent, Rule, RuleBase};
pub use ruleset::{RuleBaseVersion, RISK};
pub use score::{classify, percentage, Assessment, Verdict};
pub use variable::{FuzzyVariable, Universe, VariableRegistry};
