//! Group resolution for one tab.
//!
//! # Responsibility
//! - Pick the single group that claims a tab from its URL and title.
//! - Keep the two supported match policies separate and caller-selected.
//!
//! # Invariants
//! - A disabled config never resolves a group.
//! - `TitlePriority` ranks title hits over URL hits, then by name; numeric
//!   priority is not consulted.
//! - `PriorityOrder` only looks at URLs and returns the first hit in ascending
//!   priority (insertion order on ties).

use crate::matcher::matches_any;
use crate::model::config::{Config, Group};
use serde::{Deserialize, Serialize};

/// Which part of the tab produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    // Declaration order is the ranking order: title hits sort first.
    Title,
    Url,
}

/// Resolution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Title and URL, title hits win, alphabetical tie-break.
    #[default]
    TitlePriority,
    /// URL only, first hit in ascending priority.
    PriorityOrder,
}

/// Ephemeral resolution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchInfo<'a> {
    pub group: &'a Group,
    pub kind: MatchKind,
}

/// Policy-bound resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupResolver {
    policy: MatchPolicy,
}

impl GroupResolver {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// Resolves the group claiming a tab, honoring `config.enabled`.
    pub fn resolve<'a>(&self, url: &str, title: &str, config: &'a Config) -> Option<MatchInfo<'a>> {
        if !config.enabled {
            return None;
        }
        self.resolve_groups(url, title, &config.groups)
    }

    /// Resolves against a bare group list.
    pub fn resolve_groups<'a>(
        &self,
        url: &str,
        title: &str,
        groups: &'a [Group],
    ) -> Option<MatchInfo<'a>> {
        match self.policy {
            MatchPolicy::TitlePriority => resolve_title_priority(url, title, groups),
            MatchPolicy::PriorityOrder => resolve_priority_order(url, groups),
        }
    }
}

/// Returns how `group` matches a tab, checking title before URL.
pub fn group_match_kind(url: &str, title: &str, group: &Group) -> Option<MatchKind> {
    if matches_any(title, &group.patterns, group.mode) {
        Some(MatchKind::Title)
    } else if matches_any(url, &group.patterns, group.mode) {
        Some(MatchKind::Url)
    } else {
        None
    }
}

fn resolve_title_priority<'a>(url: &str, title: &str, groups: &'a [Group]) -> Option<MatchInfo<'a>> {
    groups
        .iter()
        .filter_map(|group| group_match_kind(url, title, group).map(|kind| MatchInfo { group, kind }))
        .min_by(|left, right| {
            left.kind
                .cmp(&right.kind)
                .then_with(|| left.group.name.cmp(&right.group.name))
        })
}

fn resolve_priority_order<'a>(url: &str, groups: &'a [Group]) -> Option<MatchInfo<'a>> {
    let mut ordered = groups.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|group| group.priority);
    ordered
        .into_iter()
        .find(|group| matches_any(url, &group.patterns, group.mode))
        .map(|group| MatchInfo {
            group,
            kind: MatchKind::Url,
        })
}
