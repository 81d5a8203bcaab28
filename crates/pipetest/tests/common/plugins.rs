//! Sample CLI plugin used across the integration tests: the `count`
//! command a plugin author would write, with a `catalog` subcommand that
//! prints how many datasets (optionally of a given type) are declared.

#![allow(dead_code)]

use clap::{Arg, ArgMatches, Command};
use serde_yaml::Value;

use pipetest::cli::builtin::load_catalog;
use pipetest::{CliContext, CliError, CommandPlugin};

pub struct CountCommand;

impl CommandPlugin for CountCommand {
    fn command(&self) -> Command {
        Command::new("count")
            .about("Count project resources")
            .subcommand_required(true)
            .subcommand(
                Command::new("catalog").about("Count catalog datasets").arg(
                    Arg::new("type")
                        .long("type")
                        .value_name("TYPE")
                        .help("Only count datasets of this type"),
                ),
            )
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut CliContext<'_>) -> Result<(), CliError> {
        match matches.subcommand() {
            Some(("catalog", sub)) => {
                let catalog = load_catalog(ctx)?;
                let wanted = sub.get_one::<String>("type");
                let count = catalog
                    .values()
                    .filter(|entry| match wanted {
                        Some(wanted) => {
                            entry
                                .as_mapping()
                                .and_then(|m| m.get("type"))
                                .and_then(Value::as_str)
                                == Some(wanted.as_str())
                        }
                        None => true,
                    })
                    .count();
                ctx.say(count.to_string());
                Ok(())
            }
            Some((other, _)) => Err(CliError::UnknownCommand(format!("count {other}"))),
            None => Err(CliError::Usage("count requires a subcommand".to_string())),
        }
    }
}
