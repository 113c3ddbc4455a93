//! Filter session state: what the user currently has selected.
//!
//! Selections are supplied fresh for every recomputation, as one explicit
//! value object keyed by filter id. Nothing in the engine reads ambient
//! state; the UI (or the CLI flags standing in for it) owns the widgets and
//! hands their values over here.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    /// Flag filter checkbox.
    Checked(bool),
    /// Range filter interval, inclusive on both ends.
    Range(f64, f64),
    /// Chosen values of a set / boolean-pair / feature-list filter.
    Values(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(BTreeMap<String, Selection>);

impl Selections {
    pub fn new() -> Self {
        Selections::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Selection> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, selection: Selection) {
        self.0.insert(id.into(), selection);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.0.iter().map(|(id, selection)| (id.as_str(), selection))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Opening selections file {path:?}"))?;
        serde_json::from_str(&raw).context("Parsing selections JSON")
    }

    /// Assemble the session state from an optional JSON file plus CLI
    /// directives. Directives override the file for the same filter id;
    /// the last directive wins within the command line.
    pub fn from_args(
        file: Option<&Path>,
        selects: &[String],
        ranges: &[String],
        flags: &[String],
    ) -> Result<Self> {
        let mut selections = match file {
            Some(path) => Selections::load(path)?,
            None => Selections::new(),
        };
        for directive in selects {
            let (id, selection) = parse_select(directive)?;
            selections.insert(id, selection);
        }
        for directive in ranges {
            let (id, selection) = parse_range(directive)?;
            selections.insert(id, selection);
        }
        for id in flags {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                return Err(anyhow!("--flag requires a filter id"));
            }
            selections.insert(trimmed, Selection::Checked(true));
        }
        Ok(selections)
    }
}

/// `id=value[,value...]`. An empty right-hand side is an explicitly empty
/// selection, which a `nothing`-policy set filter treats as hide-all.
fn parse_select(directive: &str) -> Result<(String, Selection)> {
    let (id, rest) = split_directive(directive, "--select")?;
    let values: Vec<String> = rest
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    Ok((id, Selection::Values(values)))
}

/// `id=lo:hi`, both bounds required.
fn parse_range(directive: &str) -> Result<(String, Selection)> {
    let (id, rest) = split_directive(directive, "--range")?;
    let (lo_raw, hi_raw) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("Range for '{id}' must look like lo:hi"))?;
    let lo: f64 = lo_raw
        .trim()
        .parse()
        .with_context(|| format!("Parsing lower bound '{lo_raw}' for '{id}'"))?;
    let hi: f64 = hi_raw
        .trim()
        .parse()
        .with_context(|| format!("Parsing upper bound '{hi_raw}' for '{id}'"))?;
    if lo > hi {
        return Err(anyhow!("Range for '{id}' has lower bound above upper bound"));
    }
    Ok((id, Selection::Range(lo, hi)))
}

fn split_directive(directive: &str, flag: &str) -> Result<(String, String)> {
    let trimmed = directive.trim();
    let (id, rest) = trimmed
        .split_once('=')
        .ok_or_else(|| anyhow!("{flag} expects id=value, got '{trimmed}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("{flag} directive '{trimmed}' is missing a filter id"));
    }
    Ok((id.to_string(), rest.trim().to_string()))
}
