//! Engine settings chosen by the embedding host.
//!
//! Distinct from the user's group `Config`: these select the match policy and
//! window-creation behavior, and are read once at startup.

use crate::resolver::MatchPolicy;
use crate::routing::RoutingOptions;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Host-level router settings; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterSettings {
    pub match_policy: MatchPolicy,
    pub create_window_on_unbound_match: bool,
    pub log_level: Option<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        let options = RoutingOptions::default();
        Self {
            match_policy: options.policy,
            create_window_on_unbound_match: options.create_window_on_unbound_match,
            log_level: None,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read settings: {err}"),
            Self::Parse(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl RouterSettings {
    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(text).map_err(SettingsError::Parse)
    }

    pub fn routing_options(&self) -> RoutingOptions {
        RoutingOptions {
            policy: self.match_policy,
            create_window_on_unbound_match: self.create_window_on_unbound_match,
        }
    }
}
