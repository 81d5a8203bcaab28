//! Built-in framework commands: `info`, `catalog list`, `run`.

use clap::{Arg, ArgMatches, Command};
use serde_yaml::{Mapping, Value};

use crate::error::CliError;
use crate::yaml;

use super::registry::{CliContext, CommandPlugin};

/// `info` — framework name and version.
pub struct InfoCommand;

impl CommandPlugin for InfoCommand {
    fn command(&self) -> Command {
        Command::new("info").about("Show framework information")
    }

    fn execute(&self, _matches: &ArgMatches, ctx: &mut CliContext<'_>) -> Result<(), CliError> {
        ctx.say(format!("pipetest v{}", env!("CARGO_PKG_VERSION")));
        ctx.say(format!("project: {}", ctx.layout.name()));
        Ok(())
    }
}

/// `catalog list` — dataset names from the merged base+local catalog.
pub struct CatalogCommand;

impl CommandPlugin for CatalogCommand {
    fn command(&self) -> Command {
        Command::new("catalog")
            .about("Inspect the data catalog")
            .subcommand_required(true)
            .subcommand(Command::new("list").about("List datasets declared in the catalog"))
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut CliContext<'_>) -> Result<(), CliError> {
        match matches.subcommand() {
            Some(("list", _)) => {
                let catalog = load_catalog(ctx)?;
                let mut names: Vec<String> = catalog
                    .keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect();
                names.sort();
                for name in names {
                    ctx.say(name);
                }
                Ok(())
            }
            Some((other, _)) => Err(CliError::UnknownCommand(format!("catalog {other}"))),
            None => Err(CliError::Usage("catalog requires a subcommand".to_string())),
        }
    }
}

/// The catalog as the framework sees it: `conf/base` with `conf/local`
/// entries merged over it.
pub fn load_catalog(ctx: &CliContext<'_>) -> Result<Mapping, CliError> {
    let mut catalog = yaml::read_mapping(ctx.layout.catalog())?;
    let local = ctx.layout.root().join("conf/local/catalog.yml");
    if local.exists() {
        yaml::merge_mappings(&mut catalog, yaml::read_mapping(local)?);
    }
    Ok(catalog)
}

/// `run --pipeline <name>` — resolve a pipeline against catalog and
/// parameters and report completion.
///
/// This is a resolution dry-run, not an execution engine: every node
/// input and output must exist in the catalog (or in parameters for
/// `params:`-prefixed inputs) or the command fails.
pub struct RunCommand;

impl CommandPlugin for RunCommand {
    fn command(&self) -> Command {
        Command::new("run").about("Run a pipeline").arg(
            Arg::new("pipeline")
                .long("pipeline")
                .value_name("NAME")
                .default_value("__default__")
                .help("Name of the registered pipeline to run"),
        )
    }

    fn execute(&self, matches: &ArgMatches, ctx: &mut CliContext<'_>) -> Result<(), CliError> {
        // default_value guarantees presence
        let pipeline = matches
            .get_one::<String>("pipeline")
            .cloned()
            .unwrap_or_default();

        let registry_path = ctx.layout.root().join(ctx.layout.registry_file());
        let registry = yaml::read_mapping(registry_path)?;
        if !registered_pipelines(&registry).iter().any(|p| p == &pipeline) {
            return Err(CliError::UnknownPipeline(pipeline));
        }

        let definition_path = ctx.layout.root().join(ctx.layout.pipeline_file(&pipeline));
        let definition = yaml::read_mapping(definition_path)?;
        let catalog = load_catalog(ctx)?;
        let parameters = yaml::read_mapping(ctx.layout.parameters())?;

        let nodes = resolve_nodes(&pipeline, &definition, &catalog, &parameters)?;

        ctx.say(format!("Running pipeline '{pipeline}' ({nodes} nodes)"));
        ctx.say("Pipeline execution completed");
        Ok(())
    }
}

fn registered_pipelines(registry: &Mapping) -> Vec<String> {
    registry
        .get("pipelines")
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Check every node reference and return the node count.
fn resolve_nodes(
    pipeline: &str,
    definition: &Mapping,
    catalog: &Mapping,
    parameters: &Mapping,
) -> Result<usize, CliError> {
    let nodes = definition
        .get("nodes")
        .and_then(Value::as_sequence)
        .ok_or_else(|| CliError::InvalidPipeline {
            name: pipeline.to_string(),
            reason: "definition has no 'nodes' sequence".to_string(),
        })?;

    for node in nodes {
        let node = node.as_mapping().ok_or_else(|| CliError::InvalidPipeline {
            name: pipeline.to_string(),
            reason: "node entry is not a mapping".to_string(),
        })?;

        if let Some(inputs) = node.get("inputs").and_then(Value::as_sequence) {
            for input in inputs.iter().filter_map(Value::as_str) {
                resolve_reference(pipeline, input, catalog, parameters)?;
            }
        }
        if let Some(outputs) = node.get("outputs") {
            match outputs {
                Value::String(name) => resolve_reference(pipeline, name, catalog, parameters)?,
                Value::Sequence(seq) => {
                    for name in seq.iter().filter_map(Value::as_str) {
                        resolve_reference(pipeline, name, catalog, parameters)?;
                    }
                }
                _ => {}
            }
        }
    }
    Ok(nodes.len())
}

fn resolve_reference(
    pipeline: &str,
    reference: &str,
    catalog: &Mapping,
    parameters: &Mapping,
) -> Result<(), CliError> {
    if let Some(parameter) = reference.strip_prefix("params:") {
        if !parameters.contains_key(parameter) {
            return Err(CliError::ParameterNotFound {
                pipeline: pipeline.to_string(),
                parameter: parameter.to_string(),
            });
        }
        return Ok(());
    }
    if !catalog.contains_key(reference) {
        return Err(CliError::DatasetNotFound {
            pipeline: pipeline.to_string(),
            dataset: reference.to_string(),
        });
    }
    Ok(())
}
