//! Request/response surface for the UI layer.
//!
//! # Responsibility
//! - Define one tagged request variant per UI-facing operation.
//! - Dispatch requests to `TabRouter` through a single exhaustive `match`.
//!
//! # Invariants
//! - `TabRouter::handle` never panics and never returns `Err`; failures are
//!   reported as `Response::Error`.
//! - Wire shape is `{"action": "<name>", ...camelCase fields}` for requests
//!   and `{"type": "<name>", "data": ...}` for responses.

use crate::coordinator::WindowLabel;
use crate::error::RouterResult;
use crate::host::WindowHost;
use crate::model::config::{Config, Group, MatchMode};
use crate::model::window::{Tab, WindowId};
use crate::routing::RouteOutcome;
use crate::service::router_service::{ActiveWindow, PreviewHit, TabRouter, WindowSummary};
use crate::sorter::SortReport;
use crate::store::{BindingMap, StateStore};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One `windowId -> group` pair.
///
/// Bindings travel as a list in requests: integer map keys do not survive
/// the buffering serde does for internally tagged enums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingEntry {
    pub window_id: WindowId,
    pub group: String,
}

/// UI-facing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    GetConfig,
    SaveConfig { config: Config },
    GetBindings,
    SaveBindings { entries: Vec<BindingEntry> },
    BindWindow { window_id: WindowId, group: String },
    UnbindWindow { window_id: WindowId },
    GetActiveWindow,
    SortAll,
    Rebind,
    ListWindows,
    PreviewPatterns {
        patterns: Vec<String>,
        #[serde(default)]
        mode: MatchMode,
    },
    FlashWindow { window_id: WindowId },
    LabelWindow {
        window_id: WindowId,
        #[serde(default)]
        title: Option<String>,
    },
    ExportConfig,
    ImportConfig { document: String },
    AddGroup { group: Group },
    UpdateGroup { original_name: String, group: Group },
    DeleteGroup { name: String },
    MoveGroup { name: String, target_rank: usize },
    TabNavigated { tab: Tab },
    TabCreated { tab: Tab },
    WindowRemoved { window_id: WindowId },
}

impl Request {
    /// Stable action name used in logs.
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetConfig => "getConfig",
            Self::SaveConfig { .. } => "saveConfig",
            Self::GetBindings => "getBindings",
            Self::SaveBindings { .. } => "saveBindings",
            Self::BindWindow { .. } => "bindWindow",
            Self::UnbindWindow { .. } => "unbindWindow",
            Self::GetActiveWindow => "getActiveWindow",
            Self::SortAll => "sortAll",
            Self::Rebind => "rebind",
            Self::ListWindows => "listWindows",
            Self::PreviewPatterns { .. } => "previewPatterns",
            Self::FlashWindow { .. } => "flashWindow",
            Self::LabelWindow { .. } => "labelWindow",
            Self::ExportConfig => "exportConfig",
            Self::ImportConfig { .. } => "importConfig",
            Self::AddGroup { .. } => "addGroup",
            Self::UpdateGroup { .. } => "updateGroup",
            Self::DeleteGroup { .. } => "deleteGroup",
            Self::MoveGroup { .. } => "moveGroup",
            Self::TabNavigated { .. } => "tabNavigated",
            Self::TabCreated { .. } => "tabCreated",
            Self::WindowRemoved { .. } => "windowRemoved",
        }
    }
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Response {
    Ok,
    Config(Config),
    Bindings(BindingMap),
    ActiveWindow(ActiveWindow),
    SortReport(SortReport),
    Windows(Vec<WindowSummary>),
    Preview(Vec<PreviewHit>),
    Label(WindowLabel),
    Exported(String),
    Route(RouteOutcome),
    Error { message: String },
}

impl<S: StateStore, H: WindowHost> TabRouter<S, H> {
    /// Dispatches one request.
    pub fn handle(&mut self, request: Request) -> Response {
        let action = request.action();
        debug!("event=request module=message status=start action={action}");

        match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                warn!("event=request module=message status=error action={action} error={err}");
                Response::Error {
                    message: format!("{action} failed: {err}"),
                }
            }
        }
    }

    /// Parses a JSON request, dispatches it and encodes the response.
    pub fn handle_json(&mut self, text: &str) -> String {
        let response = match serde_json::from_str::<Request>(text) {
            Ok(request) => self.handle(request),
            Err(err) => Response::Error {
                message: format!("invalid request: {err}"),
            },
        };
        serde_json::to_string(&response).unwrap_or_else(|err| {
            format!(r#"{{"type":"error","data":{{"message":"encode failed: {err}"}}}}"#)
        })
    }

    fn dispatch(&mut self, request: Request) -> RouterResult<Response> {
        let response = match request {
            Request::GetConfig => Response::Config(self.config()?),
            Request::SaveConfig { config } => Response::Config(self.save_config(config)?),
            Request::GetBindings => Response::Bindings(self.bindings()?),
            Request::SaveBindings { entries } => {
                let bindings = entries
                    .into_iter()
                    .map(|entry| (entry.window_id, entry.group))
                    .collect::<BindingMap>();
                self.save_bindings(bindings)?;
                Response::Ok
            }
            Request::BindWindow { window_id, group } => {
                self.bind_window(window_id, &group)?;
                Response::Ok
            }
            Request::UnbindWindow { window_id } => {
                self.unbind_window(window_id)?;
                Response::Ok
            }
            Request::GetActiveWindow => Response::ActiveWindow(self.active_window()?),
            Request::SortAll => Response::SortReport(self.sort_all()?),
            Request::Rebind => Response::Bindings(self.rebind()?),
            Request::ListWindows => Response::Windows(self.list_windows()?),
            Request::PreviewPatterns { patterns, mode } => {
                Response::Preview(self.preview_patterns(&patterns, mode)?)
            }
            Request::FlashWindow { window_id } => {
                self.flash_window(window_id)?;
                Response::Ok
            }
            Request::LabelWindow { window_id, title } => {
                Response::Label(self.label_window(window_id, title)?)
            }
            Request::ExportConfig => Response::Exported(self.export_config()?),
            Request::ImportConfig { document } => Response::Config(self.import_config(&document)?),
            Request::AddGroup { group } => Response::Config(self.add_group(group)?),
            Request::UpdateGroup {
                original_name,
                group,
            } => Response::Config(self.update_group(&original_name, group)?),
            Request::DeleteGroup { name } => Response::Config(self.delete_group(&name)?),
            Request::MoveGroup { name, target_rank } => {
                Response::Config(self.move_group(&name, target_rank)?)
            }
            Request::TabNavigated { tab } => Response::Route(self.on_tab_navigated(&tab)?),
            Request::TabCreated { tab } => Response::Route(self.on_tab_created(&tab)?),
            Request::WindowRemoved { window_id } => {
                self.on_window_removed(window_id)?;
                Response::Ok
            }
        };
        Ok(response)
    }
}
