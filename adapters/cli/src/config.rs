use std::{fs, path::Path};

use anyhow::{Context, Result};
use lane_siege_core::MatchRules;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    #[serde(default)]
    rules: MatchRules,
}

/// Loads match rules from a TOML file, falling back to defaults without one.
pub(crate) fn load_rules(path: Option<&Path>) -> Result<MatchRules> {
    let Some(path) = path else {
        return Ok(MatchRules::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file at {}", path.display()))?;
    parse_rules(&contents).with_context(|| format!("invalid rules file {}", path.display()))
}

fn parse_rules(contents: &str) -> Result<MatchRules> {
    let file: RulesFile = toml::from_str(contents).context("failed to parse rules toml")?;
    file.rules
        .validate()
        .context("rules cannot drive a match")?;
    Ok(file.rules)
}
