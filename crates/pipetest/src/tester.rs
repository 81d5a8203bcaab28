//! The `TestProject` facade: sandbox lifecycle, scaffolding, YAML access
//! and CLI invocation behind one handle.
//!
//! Lifecycle: **idle → active (after `new_project`) → idle (after `stop`)**.
//! Every mutating operation requires the active state and fails with
//! `PipetestError::InvalidState` otherwise, so nothing can silently write
//! into a torn-down sandbox. The temp directory itself is removed when the
//! handle is dropped, even on panic.
//!
//! Not thread-safe across handles sharing state — but each handle owns its
//! own sandbox and never touches the process working directory, so one
//! handle per test runs safely in parallel.

use std::path::PathBuf;

use serde_yaml::Mapping;
use tracing::debug;

use crate::cli::{self, CliOutcome, CommandPlugin, CommandRegistry};
use crate::error::{PipetestError, Result};
use crate::pipeline;
use crate::project::{self, ProjectLayout};
use crate::sandbox::Sandbox;
use crate::yaml;

pub struct TestProject {
    sandbox: Sandbox,
    layout: Option<ProjectLayout>,
    pipelines: Vec<String>,
    registry: CommandRegistry,
}

impl TestProject {
    /// Allocate a sandbox. No project exists yet; call [`new_project`]
    /// to scaffold one.
    ///
    /// [`new_project`]: TestProject::new_project
    pub fn new() -> Result<Self> {
        Ok(Self {
            sandbox: Sandbox::new()?,
            layout: None,
            pipelines: Vec::new(),
            registry: CommandRegistry::new(),
        })
    }

    /// Scaffold a fresh project and run `f` against it, always stopping
    /// afterwards, even when `f` fails.
    pub fn with_project<T>(name: &str, f: impl FnOnce(&mut TestProject) -> Result<T>) -> Result<T> {
        let mut project = TestProject::new()?;
        project.new_project(name)?;
        let result = f(&mut project);
        let stopped = project.stop();
        let value = result?;
        stopped?;
        Ok(value)
    }

    /// Direct access to the sandbox, for fixtures this API does not cover.
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Whether a project is currently scaffolded.
    pub fn is_active(&self) -> bool {
        self.layout.is_some()
    }

    /// Names of the pipelines created so far.
    pub fn pipelines(&self) -> &[String] {
        &self.pipelines
    }

    /// Register a CLI command plugin; it becomes available to `cli`/`run`.
    pub fn register_command(&mut self, plugin: Box<dyn CommandPlugin>) {
        self.registry.register(plugin);
    }

    fn active(&self, operation: &'static str) -> Result<&ProjectLayout> {
        self.layout
            .as_ref()
            .ok_or(PipetestError::InvalidState { operation })
    }

    /// Scaffold a minimal project named `name` and return its absolute
    /// root. Fails if a project is already active.
    pub fn new_project(&mut self, name: &str) -> Result<PathBuf> {
        if let Some(layout) = &self.layout {
            return Err(PipetestError::ProjectAlreadyActive {
                name: layout.name().to_string(),
            });
        }
        let layout = project::scaffold(&self.sandbox, name)?;
        let root = layout.root().to_path_buf();
        self.layout = Some(layout);
        Ok(root)
    }

    /// Empty the sandbox and return to the idle state. Calling `stop`
    /// with no active project is a no-op; a fresh `new_project` is allowed
    /// afterwards.
    pub fn stop(&mut self) -> Result<()> {
        if self.layout.is_none() {
            return Ok(());
        }
        self.sandbox.clean()?;
        self.layout = None;
        self.pipelines.clear();
        debug!("project stopped");
        Ok(())
    }

    /// Write a YAML mapping to `path` (relative to the project root),
    /// overwriting unconditionally. Returns the absolute path.
    pub fn write_yml(&self, path: &str, content: &Mapping) -> Result<PathBuf> {
        self.active("write_yml")?;
        let absolute = self.sandbox.resolve(path)?;
        Ok(yaml::write_mapping(absolute, content)?)
    }

    /// Read the YAML mapping at `path` (relative to the project root).
    pub fn read_yml(&self, path: &str) -> Result<Mapping> {
        self.active("read_yml")?;
        let absolute = self.sandbox.resolve(path)?;
        Ok(yaml::read_mapping(absolute)?)
    }

    /// Deep-merge `content` into the YAML document at `path` (relative to
    /// the project root), creating it if absent. Returns the absolute path.
    pub fn update_yml(&self, path: &str, content: &Mapping) -> Result<PathBuf> {
        self.active("update_yml")?;
        let absolute = self.sandbox.resolve(path)?;
        Ok(yaml::update_mapping(absolute, content)?)
    }

    /// Create a minimal pipeline plus its default catalog and parameter
    /// entries. Creating the same pipeline twice is a no-op.
    pub fn create_pipeline(&mut self, name: &str) -> Result<()> {
        self.create_pipeline_with(name, &[])
    }

    /// Like [`create_pipeline`], with extra YAML fragments deep-merged
    /// over the generated definition.
    ///
    /// [`create_pipeline`]: TestProject::create_pipeline
    pub fn create_pipeline_with(&mut self, name: &str, fragments: &[Mapping]) -> Result<()> {
        let layout = self.active("create_pipeline")?.clone();
        if self.pipelines.iter().any(|p| p == name) {
            return Ok(());
        }
        pipeline::scaffold(&self.sandbox, &layout, name, fragments)?;
        self.pipelines.push(name.to_string());
        project::write_registry(&self.sandbox, &layout, &self.pipelines)?;
        Ok(())
    }

    /// Invoke a CLI command in-process: `cmd` is the subcommand path,
    /// `args` the flags and options. Command failure is reported inside
    /// the returned outcome, never as `Err`.
    pub fn cli(&self, cmd: &[&str], args: &[&str]) -> Result<CliOutcome> {
        let layout = self.active("cli")?;
        let argv: Vec<&str> = cmd.iter().chain(args.iter()).copied().collect();
        Ok(cli::invoke(layout, &self.registry, &argv))
    }

    /// Run a pipeline with the standard `run` command.
    pub fn run(&self, pipeline: &str) -> Result<CliOutcome> {
        self.run_with(pipeline, &["run"], &[])
    }

    /// Run a pipeline with a custom run command; `--pipeline <name>` is
    /// appended after `args`.
    pub fn run_with(&self, pipeline: &str, run_command: &[&str], args: &[&str]) -> Result<CliOutcome> {
        let mut full_args: Vec<&str> = args.to_vec();
        full_args.push("--pipeline");
        full_args.push(pipeline);
        self.cli(run_command, &full_args)
    }
}
