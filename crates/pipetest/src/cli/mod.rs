//! In-process invocation of the framework CLI.
//!
//! The command tree is assembled from the built-in commands plus any
//! registered [`CommandPlugin`] extensions, parsed with `clap`, and
//! dispatched against the scaffolded project. Output is captured into the
//! returned [`CliOutcome`] rather than printed, and failures are returned
//! as data rather than propagated.

pub mod builtin;
mod outcome;
mod registry;

pub use outcome::CliOutcome;
pub use registry::{CliContext, CommandPlugin, CommandRegistry};

use clap::error::ErrorKind;
use tracing::debug;

use crate::error::CliError;
use crate::project::ProjectLayout;

fn build_root(registry: &CommandRegistry) -> clap::Command {
    let mut root = clap::Command::new("pipeline")
        .about("Pipeline framework command line")
        .subcommand_required(true)
        .arg_required_else_help(true);
    for command in registry.commands() {
        root = root.subcommand(command);
    }
    root
}

/// Parse `argv` (subcommand path plus arguments, without a binary name)
/// and execute the matching command against the project.
pub fn invoke(layout: &ProjectLayout, registry: &CommandRegistry, argv: &[&str]) -> CliOutcome {
    debug!(argv = ?argv, project = layout.name(), "invoking cli");

    let full_argv = std::iter::once("pipeline").chain(argv.iter().copied());
    let matches = match build_root(registry).try_get_matches_from(full_argv) {
        Ok(matches) => matches,
        Err(err) => {
            let rendered = err.render().to_string();
            return match err.kind() {
                // --help and --version are successful exits in clap terms
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => CliOutcome::success(rendered),
                _ => CliOutcome::failure(2, String::new(), CliError::Usage(rendered)),
            };
        }
    };

    let (name, sub_matches) = match matches.subcommand() {
        Some(pair) => pair,
        None => {
            return CliOutcome::failure(
                2,
                String::new(),
                CliError::Usage("a subcommand is required".to_string()),
            )
        }
    };

    let plugin = match registry.find(name) {
        Some(plugin) => plugin,
        None => {
            return CliOutcome::failure(2, String::new(), CliError::UnknownCommand(name.to_string()))
        }
    };

    let mut ctx = CliContext::new(layout);
    match plugin.execute(sub_matches, &mut ctx) {
        Ok(()) => CliOutcome::success(ctx.into_output()),
        Err(error) => {
            debug!(command = name, %error, "command failed");
            CliOutcome::failure(1, ctx.into_output(), error)
        }
    }
}
