//! Tab routing core.
//! Decides which window every tab belongs in and keeps one window per group.

pub mod binding;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod host;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod rebind;
pub mod resolver;
pub mod routing;
pub mod service;
pub mod settings;
pub mod sorter;
pub mod store;

pub use binding::{BindingCache, BindingTable};
pub use coordinator::{MoveOutcome, WindowCoordinator, WindowLabel};
pub use error::{RouterError, RouterResult};
pub use host::{HostError, HostResult, InMemoryHost, TabGroup, TabGroupColor, WindowHost};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::config::{Config, ConfigError, Group, MatchMode};
pub use model::window::{Tab, TabId, Window, WindowId, WindowKind};
pub use rebind::rebind;
pub use resolver::{GroupResolver, MatchInfo, MatchKind, MatchPolicy};
pub use routing::{RouteOutcome, RoutingEngine, RoutingOptions};
pub use service::message::{BindingEntry, Request, Response};
pub use service::router_service::{ActiveWindow, PreviewHit, TabRouter, WindowSummary};
pub use settings::{RouterSettings, SettingsError};
pub use sorter::{sort_all, SortReport};
pub use store::{
    BindingMap, MemoryStateStore, SqliteStateStore, StateStore, StorageArea, StoreError,
    StoreResult,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
