//! Board model: the declarative configuration one dashboard revision is.
//!
//! A board names the dataset columns it cares about (with semantic kinds and
//! canonicalization rules), the sidebar filters, the display mapping, and the
//! default sort. New dashboard revisions are new board files, not new code.
//!
//! ## Responsibilities
//!
//! - YAML board loading and saving via `serde_yaml`
//! - Filter specifications (set, boolean pair, flag, range, feature list)
//! - Display mapping with per-column format kinds
//! - Validation: duplicate filter ids, duplicate display labels, and
//!   malformed boolean pairs are configuration errors caught at load

use std::{borrow::Cow, collections::HashSet, fmt, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Raw tokens treated as not-available markers when a column opts into
/// `na` replacement.
const NA_PLACEHOLDERS: &[&str] = &["na", "n/a", "null", "none", "-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Categorical,
    Boolean,
    Numeric,
    Link,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Categorical => "categorical",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Link => "link",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Load-time value cleanup for a column. Applied exactly once when the
/// dataset is read, so repeated mask evaluations see stable values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Canonicalize {
    #[serde(default = "Canonicalize::default_trim")]
    pub trim: bool,
    #[serde(default)]
    pub case_fold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub na: Option<String>,
}

impl Default for Canonicalize {
    fn default() -> Self {
        Canonicalize {
            trim: true,
            case_fold: false,
            na: None,
        }
    }
}

impl Canonicalize {
    const fn default_trim() -> bool {
        true
    }

    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let trimmed = if self.trim { value.trim() } else { value };
        let mut current: Cow<'a, str> = Cow::Borrowed(trimmed);
        if self.case_fold {
            let folded = current.to_ascii_lowercase();
            if folded != current.as_ref() {
                current = Cow::Owned(folded);
            }
        }
        if let Some(replacement) = self.na.as_deref() {
            let lowered = current.to_ascii_lowercase();
            if current.is_empty() || NA_PLACEHOLDERS.contains(&lowered.as_str()) {
                current = Cow::Owned(replacement.to_string());
            }
        }
        current
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonicalize: Option<Canonicalize>,
}

/// What an explicitly empty set-filter selection means. UIs that start with
/// every value pre-checked want `nothing` (deselecting all hides all rows);
/// UIs that start unchecked want `everything` (empty means unrestricted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    Nothing,
    #[default]
    Everything,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairState {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureLabel {
    pub label: String,
    pub column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub id: String,
    #[serde(flatten)]
    pub rule: FilterRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterRule {
    /// Restrict a categorical column to a chosen subset of its values.
    Set {
        column: String,
        #[serde(default)]
        on_empty: EmptyPolicy,
    },
    /// Two named checkbox states mapping to two stored values.
    BoolPair {
        column: String,
        states: Vec<PairState>,
    },
    /// Single checkbox requiring an exact match when checked.
    Flag { column: String, true_value: String },
    /// Inclusive numeric interval; bounds come from the dataset at load.
    Range { column: String },
    /// Conjunctive group of 0/1 columns selected by friendly label.
    Features { labels: Vec<FeatureLabel> },
}

impl FilterRule {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterRule::Set { .. } => "set",
            FilterRule::BoolPair { .. } => "bool_pair",
            FilterRule::Flag { .. } => "flag",
            FilterRule::Range { .. } => "range",
            FilterRule::Features { .. } => "features",
        }
    }

    /// The single backing column, where the rule has one.
    pub fn column(&self) -> Option<&str> {
        match self {
            FilterRule::Set { column, .. }
            | FilterRule::BoolPair { column, .. }
            | FilterRule::Flag { column, .. }
            | FilterRule::Range { column } => Some(column),
            FilterRule::Features { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayFormat {
    #[default]
    Text,
    Link {
        #[serde(default = "DisplayFormat::default_link_label")]
        link_label: String,
    },
    Percent,
    Decimal {
        places: usize,
    },
    Currency {
        #[serde(default = "DisplayFormat::default_symbol")]
        symbol: String,
    },
}

impl DisplayFormat {
    fn default_link_label() -> String {
        "View".to_string()
    }

    fn default_symbol() -> String {
        "$".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayColumn {
    pub column: String,
    pub label: String,
    #[serde(default)]
    pub format: DisplayFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default = "SortSpec::default_descending")]
    pub descending: bool,
}

impl SortSpec {
    const fn default_descending() -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub display: Vec<DisplayColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl Board {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening board file {path:?}"))?;
        let reader = BufReader::new(file);
        let board: Board = serde_yaml::from_reader(reader).context("Parsing board YAML")?;
        board.validate()?;
        Ok(board)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let board: Board = serde_yaml::from_str(input).context("Parsing board YAML")?;
        board.validate()?;
        Ok(board)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating board file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing board YAML")
    }

    /// Configuration errors are caught here, at load, so the evaluation
    /// engine can treat the board as well-formed.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for filter in &self.filters {
            ensure!(
                !filter.id.trim().is_empty(),
                "Filter with rule '{}' is missing an id",
                filter.rule.kind_name()
            );
            ensure!(
                ids.insert(filter.id.as_str()),
                "Duplicate filter id '{}'",
                filter.id
            );
            match &filter.rule {
                FilterRule::BoolPair { states, .. } => {
                    ensure!(
                        states.len() == 2,
                        "Filter '{}' must declare exactly two states, found {}",
                        filter.id,
                        states.len()
                    );
                    ensure!(
                        states[0].value != states[1].value,
                        "Filter '{}' states must map to distinct stored values",
                        filter.id
                    );
                }
                FilterRule::Features { labels } => {
                    ensure!(
                        !labels.is_empty(),
                        "Filter '{}' declares an empty feature list",
                        filter.id
                    );
                }
                _ => {}
            }
        }

        let mut labels = HashSet::new();
        for display in &self.display {
            ensure!(
                labels.insert(display.label.as_str()),
                "Duplicate display label '{}'",
                display.label
            );
            if let DisplayFormat::Decimal { places } = display.format {
                ensure!(
                    places <= 10,
                    "Display column '{}' requests {} decimal places (max 10)",
                    display.column,
                    places
                );
            }
        }
        Ok(())
    }

    pub fn column_spec(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|spec| spec.name == name)
    }

    /// Columns the board does not describe are plain text.
    pub fn column_kind(&self, name: &str) -> ColumnKind {
        self.column_spec(name)
            .map(|spec| spec.kind)
            .unwrap_or(ColumnKind::Text)
    }

    pub fn filter(&self, id: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|filter| filter.id == id)
    }
}
