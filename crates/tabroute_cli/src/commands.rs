//! Subcommand implementations over a snapshot-backed router.

use crate::cli::{PreviewArgs, RouteArgs, SnapshotArgs};
use anyhow::{anyhow, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tabroute_core::{
    BindingMap, Config, InMemoryHost, MatchMode, MemoryStateStore, RoutingOptions, SortReport,
    TabRouter, Window, WindowHost,
};

type SnapshotRouter = TabRouter<MemoryStateStore, InMemoryHost>;

/// Recorded browser state plus stored router state.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub windows: Vec<Window>,
    pub config: Config,
    pub bindings: BindingMap,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read snapshot `{}`", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid snapshot `{}`", path.display()))
    }

    fn into_router(self, options: RoutingOptions) -> Result<SnapshotRouter> {
        let host = InMemoryHost::from_windows(self.windows);
        let mut router = TabRouter::new(MemoryStateStore::new(), host, options);
        router.save_config(self.config)?;
        router.save_bindings(self.bindings)?;
        Ok(router)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SortOutput {
    report: SortReport,
    bindings: BindingMap,
    windows: Vec<Window>,
}

pub fn run_sort(args: &SnapshotArgs, options: RoutingOptions) -> Result<()> {
    let mut router = Snapshot::load(&args.snapshot)?.into_router(options)?;
    let report = router.sort_all()?;
    info!(
        "event=cli_sort module=cli status=ok moved={} errors={}",
        report.moved,
        report.errors.len()
    );
    print_json(&SortOutput {
        report,
        bindings: router.bindings()?,
        windows: router.host().windows()?,
    })
}

pub fn run_rebind(args: &SnapshotArgs, options: RoutingOptions) -> Result<()> {
    let mut router = Snapshot::load(&args.snapshot)?.into_router(options)?;
    let bindings = router.rebind()?;
    print_json(&bindings)
}

pub fn run_preview(args: &PreviewArgs, options: RoutingOptions) -> Result<()> {
    let router = Snapshot::load(&args.input.snapshot)?.into_router(options)?;
    let mode = if args.regex {
        MatchMode::Regex
    } else {
        MatchMode::Simple
    };
    let hits = router.preview_patterns(&args.patterns, mode)?;
    print_json(&hits)
}

pub fn run_route(args: &RouteArgs, options: RoutingOptions) -> Result<()> {
    let mut router = Snapshot::load(&args.input.snapshot)?.into_router(options)?;
    let tab = router
        .host()
        .tab(args.tab_id)?
        .ok_or_else(|| anyhow!("tab {} is not in the snapshot", args.tab_id))?;
    let outcome = router.on_tab_navigated(&tab)?;
    print_json(&outcome)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("cannot encode output")?;
    println!("{text}");
    Ok(())
}
