//! Group configuration model.
//!
//! # Responsibility
//! - Define `Group`/`Config` records shared by resolver, rebinder and sorter.
//! - Validate structural edits and imports before they replace live config.
//! - Keep priorities dense through one explicit renumbering operation.
//!
//! # Invariants
//! - No two groups share a name (compared after trimming).
//! - Every group carries at least one non-blank pattern.
//! - After any structural change priorities are exactly `0..n-1`, ordered by
//!   previous priority with insertion order breaking ties.

use crate::model::window::WindowId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pattern evaluation mode of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring containment.
    #[default]
    Simple,
    /// Case-insensitive regular expression.
    Regex,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Regex => "regex",
        }
    }
}

/// One routing group: tabs matching `patterns` belong in the group's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// User-facing unique key; also the value stored in window bindings.
    pub name: String,
    pub patterns: Vec<String>,
    /// Lower value = higher priority.
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub mode: MatchMode,
}

impl Group {
    pub fn new(name: impl Into<String>, patterns: &[&str], priority: i64, mode: MatchMode) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.iter().map(|value| value.to_string()).collect(),
            priority,
            mode,
        }
    }

    /// Returns a trimmed copy with blank patterns dropped.
    ///
    /// # Errors
    /// - `BlankGroupName` when the name is blank.
    /// - `NoPatterns` when no non-blank pattern remains.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::BlankGroupName);
        }
        let patterns = self
            .patterns
            .iter()
            .map(|pattern| pattern.trim())
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if patterns.is_empty() {
            return Err(ConfigError::NoPatterns(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            patterns,
            priority: self.priority,
            mode: self.mode,
        })
    }
}

/// Routing configuration, persisted under the synced `config` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub catch_all_window_id: Option<WindowId>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            groups: Vec::new(),
            catch_all_window_id: None,
        }
    }
}

/// Configuration validation and import errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Group name is blank after trim.
    BlankGroupName,
    /// Group has no usable pattern.
    NoPatterns(String),
    /// Two groups share one name.
    DuplicateGroupName(String),
    /// Named group does not exist.
    GroupNotFound(String),
    /// Imported entry at `index` has no `name` field.
    MissingName { index: usize },
    /// Imported entry at `index` has no `patterns` field.
    MissingPatterns { index: usize },
    /// Import payload is not valid JSON of a supported shape.
    Malformed(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankGroupName => write!(f, "group name must not be blank"),
            Self::NoPatterns(name) => write!(f, "group `{name}` has no patterns"),
            Self::DuplicateGroupName(name) => write!(f, "duplicate group name `{name}`"),
            Self::GroupNotFound(name) => write!(f, "group not found: {name}"),
            Self::MissingName { index } => write!(f, "imported group #{index} has no name"),
            Self::MissingPatterns { index } => {
                write!(f, "imported group #{index} has no patterns")
            }
            Self::Malformed(message) => write!(f, "malformed config document: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Portable export document.
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    groups: &'a [Group],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Wrapped { groups: Vec<ImportedGroup> },
    Bare(Vec<ImportedGroup>),
}

#[derive(Debug, Deserialize)]
struct ImportedGroup {
    name: Option<String>,
    patterns: Option<Vec<String>>,
    priority: Option<i64>,
    mode: Option<MatchMode>,
}

impl Config {
    /// Looks up one group by exact name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Returns groups in ascending priority, insertion order breaking ties.
    pub fn groups_by_priority(&self) -> Vec<&Group> {
        let mut ordered = self.groups.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|group| group.priority);
        ordered
    }

    /// Renumbers priorities to their rank.
    ///
    /// Sorts ascending by current priority (stable) and assigns `0..n-1`.
    /// The group list itself is left in that order.
    pub fn renumber_priorities(&mut self) {
        self.groups.sort_by_key(|group| group.priority);
        for (rank, group) in self.groups.iter_mut().enumerate() {
            group.priority = rank as i64;
        }
    }

    /// Validates and normalizes every group, then renumbers priorities.
    ///
    /// Leaves `self` untouched on error.
    pub fn normalize(&mut self) -> Result<(), ConfigError> {
        let groups = normalize_groups(&self.groups)?;
        self.groups = groups;
        self.renumber_priorities();
        Ok(())
    }

    /// Appends a group at the lowest priority.
    pub fn add_group(&mut self, group: Group) -> Result<(), ConfigError> {
        let mut group = group.normalized()?;
        if self.group(&group.name).is_some() {
            return Err(ConfigError::DuplicateGroupName(group.name));
        }
        group.priority = self
            .groups
            .iter()
            .map(|existing| existing.priority)
            .max()
            .map_or(0, |max| max + 1);
        self.groups.push(group);
        self.renumber_priorities();
        Ok(())
    }

    /// Replaces the group named `original_name`, keeping its priority slot.
    pub fn update_group(&mut self, original_name: &str, group: Group) -> Result<(), ConfigError> {
        let mut group = group.normalized()?;
        let index = self
            .groups
            .iter()
            .position(|existing| existing.name == original_name)
            .ok_or_else(|| ConfigError::GroupNotFound(original_name.to_string()))?;
        let clashes = self
            .groups
            .iter()
            .enumerate()
            .any(|(other, existing)| other != index && existing.name == group.name);
        if clashes {
            return Err(ConfigError::DuplicateGroupName(group.name));
        }
        group.priority = self.groups[index].priority;
        self.groups[index] = group;
        self.renumber_priorities();
        Ok(())
    }

    /// Removes one group and returns it.
    pub fn remove_group(&mut self, name: &str) -> Result<Group, ConfigError> {
        let index = self
            .groups
            .iter()
            .position(|group| group.name == name)
            .ok_or_else(|| ConfigError::GroupNotFound(name.to_string()))?;
        let removed = self.groups.remove(index);
        self.renumber_priorities();
        Ok(removed)
    }

    /// Moves one group to `target_rank` in priority order (clamped).
    pub fn move_group(&mut self, name: &str, target_rank: usize) -> Result<(), ConfigError> {
        self.renumber_priorities();
        let index = self
            .groups
            .iter()
            .position(|group| group.name == name)
            .ok_or_else(|| ConfigError::GroupNotFound(name.to_string()))?;
        let group = self.groups.remove(index);
        let target_rank = target_rank.min(self.groups.len());
        self.groups.insert(target_rank, group);
        for (rank, group) in self.groups.iter_mut().enumerate() {
            group.priority = rank as i64;
        }
        Ok(())
    }

    /// Serializes the group list as a pretty JSON export document.
    pub fn export_json(&self) -> Result<String, ConfigError> {
        let mut ordered = self.groups.clone();
        ordered.sort_by_key(|group| group.priority);
        serde_json::to_string_pretty(&ExportDocument { groups: &ordered })
            .map_err(|err| ConfigError::Malformed(err.to_string()))
    }

    /// Parses an export document (or a bare group array) into groups.
    ///
    /// Missing `mode` defaults to simple; missing `priority` defaults to the
    /// entry position. The result is validated and renumbered.
    ///
    /// # Errors
    /// - `Malformed` when the text is not a supported JSON shape.
    /// - `MissingName`/`MissingPatterns` for incomplete entries.
    /// - Any group validation error.
    pub fn import_json(text: &str) -> Result<Vec<Group>, ConfigError> {
        let document: ImportDocument =
            serde_json::from_str(text).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        let entries = match document {
            ImportDocument::Wrapped { groups } => groups,
            ImportDocument::Bare(groups) => groups,
        };

        let mut groups = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let name = entry.name.ok_or(ConfigError::MissingName { index })?;
            let patterns = entry
                .patterns
                .ok_or(ConfigError::MissingPatterns { index })?;
            groups.push(Group {
                name,
                patterns,
                priority: entry.priority.unwrap_or(index as i64),
                mode: entry.mode.unwrap_or_default(),
            });
        }

        let mut imported = Config {
            groups,
            ..Config::default()
        };
        imported.normalize()?;
        Ok(imported.groups)
    }
}

fn normalize_groups(groups: &[Group]) -> Result<Vec<Group>, ConfigError> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(groups.len());
    for group in groups {
        let group = group.normalized()?;
        if !seen.insert(group.name.clone()) {
            return Err(ConfigError::DuplicateGroupName(group.name));
        }
        normalized.push(group);
    }
    Ok(normalized)
}
