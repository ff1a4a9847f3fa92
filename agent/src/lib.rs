//! Remote shell command execution agent
//!
//! Exposes one HTTP endpoint that runs an authenticated command through the
//! host shell and returns its combined output as JSON.

pub mod client;
pub mod config;
pub mod exec;
pub mod telemetry;
pub mod types;
pub mod web;

pub use client::{AgentClient, ClientError};
pub use config::{AgentConfig, ConfigOverrides};
pub use exec::ShellExecutor;
pub use types::{CommandRequest, CommandResponse, ExecError, RejectError};
