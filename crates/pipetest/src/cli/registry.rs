//! Command registry: built-in framework commands plus plugin extensions.

use clap::{ArgMatches, Command};

use crate::error::CliError;
use crate::project::ProjectLayout;

use super::builtin::{CatalogCommand, InfoCommand, RunCommand};

/// Execution context passed to every command: the project root and a
/// buffer standing in for standard output.
pub struct CliContext<'a> {
    pub layout: &'a ProjectLayout,
    out: String,
}

impl<'a> CliContext<'a> {
    pub(crate) fn new(layout: &'a ProjectLayout) -> Self {
        Self {
            layout,
            out: String::new(),
        }
    }

    /// Append a line to the captured output.
    pub fn say(&mut self, line: impl AsRef<str>) {
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn into_output(self) -> String {
        self.out
    }
}

/// A top-level CLI subcommand.
///
/// This is the extension seam the library exists to test: a plugin
/// contributes a `clap` command (possibly with its own subcommands) and an
/// execute function that receives the matches for it.
pub trait CommandPlugin {
    /// The clap command definition; its name becomes the subcommand name.
    fn command(&self) -> Command;

    /// Execute against the parsed matches for this subcommand.
    fn execute(&self, matches: &ArgMatches, ctx: &mut CliContext<'_>) -> Result<(), CliError>;
}

/// Holds the built-in commands and any registered plugins.
pub struct CommandRegistry {
    plugins: Vec<Box<dyn CommandPlugin>>,
}

impl CommandRegistry {
    /// A registry with the framework's built-in commands.
    pub fn new() -> Self {
        Self {
            plugins: vec![
                Box::new(InfoCommand),
                Box::new(CatalogCommand),
                Box::new(RunCommand),
            ],
        }
    }

    /// Register an additional command plugin.
    pub fn register(&mut self, plugin: Box<dyn CommandPlugin>) {
        self.plugins.push(plugin);
    }

    pub(crate) fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.plugins.iter().map(|p| p.command())
    }

    pub(crate) fn find(&self, name: &str) -> Option<&dyn CommandPlugin> {
        self.plugins
            .iter()
            .find(|p| p.command().get_name() == name)
            .map(|p| p.as_ref())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
