mod classify;
mod handles;
mod remote;
mod service;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
pub use classify::*;
pub use handles::*;
pub use service::*;

use crate::errors::*;

err_impl! {ReadinessError,
    #[error("Resource {0} is not ready")]
    NotReady(String),

    #[error("required resource {0} does not exist")]
    MissingDependency(String),

    #[error("remote call for {0} timed out")]
    RemoteCallTimedOut(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        self == Readiness::Ready
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readiness::Ready => f.write_str("ready"),
            Readiness::NotReady => f.write_str("not ready"),
        }
    }
}

/// Reserved filter parameters for status evaluation; none of the built-in
/// kinds consult it yet, but it is threaded through the aggregator so future
/// filters apply to dependents too.
#[derive(Clone, Debug, Default)]
pub struct StatusQuery {
    pub meta: BTreeMap<String, String>,
}

/// The uniform contract every resource kind answers: what is your identity,
/// make sure you exist, and are you ready right now.
///
/// `status` performs a fresh remote read on every call and never mutates
/// anything; a failed read surfaces as `Err` carrying the underlying cause,
/// which is a different outcome than a successful read that classifies as
/// `NotReady`.  `create` is idempotent: existence, not readiness, gates the
/// remote write, so repeated reconciliation passes are safe.
#[async_trait]
pub trait ResourceHandle: Send + Sync {
    /// Stable `"<kind>/<name>"` identity; pure, no I/O.
    fn key(&self) -> String;

    async fn create(&mut self) -> EmptyResult;

    async fn status(&self, query: &StatusQuery) -> anyhow::Result<Readiness>;
}

#[cfg(test)]
pub mod tests;
