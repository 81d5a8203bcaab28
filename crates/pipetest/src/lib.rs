//! Test fixtures for pipeline-framework CLI plugins.
//!
//! Scaffolds a minimal project inside a temporary sandbox, provides YAML
//! read/merge/write helpers for its configuration, and invokes framework
//! and plugin commands in-process, returning captured output and exit
//! codes for assertions. See [`TestProject`] for the main entry point.

pub mod cli;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod project;
pub mod sandbox;
pub mod tester;
pub mod yaml;

pub use cli::{CliContext, CliOutcome, CommandPlugin, CommandRegistry};
pub use error::{CliError, PipetestError, Result, SandboxError, YamlError};
pub use project::ProjectLayout;
pub use sandbox::Sandbox;
pub use tester::TestProject;
