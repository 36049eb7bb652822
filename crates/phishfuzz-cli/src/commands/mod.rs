// crates/phishfuzz-cli/src/commands/mod.rs
//
// Command module declarations and the shared report renderer.

pub mod eval;
pub mod rules;
pub mod scan;

use phishfuzz_core::{Assessment, FeatureRecord, InferenceEngine, RuleFiring};
use phishfuzz_extract::Sentinels;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_json, format_table, FieldRow, OutputFormat};

/// Everything a command needs, built once in main.
pub struct Context {
    pub engine: InferenceEngine,
    pub sentinels: Sentinels,
    pub format: OutputFormat,
}

/// Machine-readable result of scoring one record.
#[derive(Debug, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub assessment: Assessment,
    /// Feature keys that hold sentinel values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substituted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firings: Option<Vec<RuleFiring>>,
}

#[derive(Debug, Tabled)]
struct FiringRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Strength")]
    strength: String,
}

/// Score `record` and print the result in the context's format.
pub fn report(
    ctx: &Context,
    url: Option<String>,
    record: &FeatureRecord,
    substituted: Vec<String>,
    explain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (assessment, firings) = if explain {
        let (assessment, inference) = ctx.engine.assess_explained(record)?;
        (assessment, Some(inference.firings))
    } else {
        (ctx.engine.assess(record)?, None)
    };

    let report = Report {
        url,
        assessment,
        substituted,
        firings,
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &Report) {
    let a = &report.assessment;

    let mut summary = Vec::new();
    if let Some(url) = &report.url {
        summary.push(FieldRow::new("URL", url));
    }
    summary.push(FieldRow::new("Verdict", a.verdict));
    summary.push(FieldRow::new("Score", format!("{:.3}", a.score)));
    summary.push(FieldRow::new("Percentage", format!("{:.1}%", a.percentage)));
    summary.push(FieldRow::new("Crisp risk", format!("{:.4}", a.crisp_risk)));
    summary.push(FieldRow::new("Rule base", &a.rule_base));
    println!("{}", format_table(&summary));
    println!("{}", a.verdict.message());
    println!();

    let breakdown: Vec<FieldRow> = a
        .breakdown
        .iter()
        .map(|(key, value)| {
            let marker = if report.substituted.iter().any(|s| s == key.as_str()) {
                " (sentinel)"
            } else {
                ""
            };
            FieldRow::new(key.as_str(), format!("{}{}", value, marker))
        })
        .collect();
    println!("Features");
    println!("{}", format_table(&breakdown));

    if let Some(firings) = &report.firings {
        let rows: Vec<FiringRow> = firings
            .iter()
            .map(|f| FiringRow {
                index: f.index + 1,
                rule: f.rule.clone(),
                strength: format!("{:.4}", f.strength),
            })
            .collect();
        println!();
        println!("Rule firings");
        println!("{}", format_table(&rows));
    }
}
