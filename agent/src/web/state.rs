//! Shared application state

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::exec::ShellExecutor;

/// Immutable per-process state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Expected value of the `Senha` header
    pub shared_secret: Arc<str>,
    /// Runs the decoded command lines
    pub executor: ShellExecutor,
}

impl AppState {
    pub fn new(shared_secret: impl Into<Arc<str>>, executor: ShellExecutor) -> Self {
        Self {
            shared_secret: shared_secret.into(),
            executor,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.shared_secret.as_str(),
            ShellExecutor::new(config.shell.clone()),
        )
    }
}
