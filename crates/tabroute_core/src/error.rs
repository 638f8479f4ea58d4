//! Router-level error type.
//!
//! Every failure path in routing degrades to "leave the tab where it is";
//! these errors only reach the caller when storage or host enumeration fails
//! outright, or when a config edit is rejected.

use crate::host::HostError;
use crate::model::config::ConfigError;
use crate::model::window::WindowId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RouterResult<T> = Result<T, RouterError>;

#[derive(Debug)]
pub enum RouterError {
    Store(StoreError),
    Host(HostError),
    Config(ConfigError),
    /// Operation needs a bound window but this one has no group.
    WindowUnbound(WindowId),
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "storage error: {err}"),
            Self::Host(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::WindowUnbound(id) => write!(f, "window {id} is not bound to a group"),
        }
    }
}

impl Error for RouterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Host(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::WindowUnbound(_) => None,
        }
    }
}

impl From<StoreError> for RouterError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<HostError> for RouterError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

impl From<ConfigError> for RouterError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
