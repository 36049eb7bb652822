// crates/phishfuzz-cli/src/commands/rules.rs
//
// `phishfuzz rules`: list the active rule base.

use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{format_json, format_table, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "If")]
    antecedent: String,
    #[tabled(rename = "Then risk is")]
    consequent: String,
}

#[derive(Debug, Serialize)]
struct RuleListing<'a> {
    name: &'a str,
    fingerprint: &'a str,
    rules: Vec<RuleRow>,
}

/// Run the rules command.
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let rule_base = ctx.engine.rule_base();
    let rows: Vec<RuleRow> = rule_base
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleRow {
            index: i + 1,
            antecedent: rule.antecedent.to_string(),
            consequent: rule.consequent.clone(),
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => {
            let listing = RuleListing {
                name: rule_base.name(),
                fingerprint: ctx.engine.fingerprint(),
                rules: rows,
            };
            println!("{}", format_json(&listing));
        }
        OutputFormat::Table => {
            println!("Rule base:   {}", rule_base.name());
            println!("Fingerprint: {}", ctx.engine.fingerprint());
            println!();
            println!("{}", format_table(&rows));
        }
    }

    Ok(())
}
