//! Pipeline scaffolding: definition file, catalog entries, parameter entry.
//!
//! The framework's own pipeline-creation command pulls a starter template
//! over the network; this module generates an equivalent minimal pipeline
//! locally so tests never need network access. Each scaffolded pipeline
//! gets a declarative definition with one node, two file-backed catalog
//! datasets named after it, and one parameter.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::Result;
use crate::project::{ProjectLayout, CATALOG_PATH, PARAMETERS_PATH};
use crate::sandbox::Sandbox;
use crate::yaml;

/// Dataset type used for the default catalog entries.
pub const DEFAULT_DATASET_TYPE: &str = "csv.CsvDataset";

const SAMPLE_CSV: &str = "a,b\n1,0\n2,1\n3,2\n";

/// The generated default definition: one node that reads the pipeline's
/// input dataset and parameter and writes its output dataset.
pub fn default_definition(pipeline: &str) -> Mapping {
    let mut node = Mapping::new();
    node.insert(Value::from("name"), Value::from("add_column"));
    node.insert(
        Value::from("inputs"),
        Value::Sequence(vec![
            Value::from(format!("{pipeline}-input")),
            Value::from(format!("params:{pipeline}-param")),
        ]),
    );
    node.insert(Value::from("outputs"), Value::from(format!("{pipeline}-output")));

    let mut definition = Mapping::new();
    definition.insert(
        Value::from("nodes"),
        Value::Sequence(vec![Value::Mapping(node)]),
    );
    definition
}

fn dataset_entry(filepath: &str) -> Value {
    let mut entry = Mapping::new();
    entry.insert(Value::from("type"), Value::from(DEFAULT_DATASET_TYPE));
    entry.insert(Value::from("filepath"), Value::from(filepath));
    Value::Mapping(entry)
}

/// Catalog additions for `pipeline`: `<name>-input` and `<name>-output`.
pub fn catalog_entries(pipeline: &str) -> Mapping {
    let mut entries = Mapping::new();
    entries.insert(
        Value::from(format!("{pipeline}-input")),
        dataset_entry("data/input.csv"),
    );
    entries.insert(
        Value::from(format!("{pipeline}-output")),
        dataset_entry("data/output.csv"),
    );
    entries
}

/// Parameter addition for `pipeline`: `<name>-param: 1`.
pub fn parameter_entries(pipeline: &str) -> Mapping {
    let mut entries = Mapping::new();
    entries.insert(Value::from(format!("{pipeline}-param")), Value::from(1));
    entries
}

/// Materialize `pipeline` inside the project: sample data, definition file
/// (the default deep-merged with any extra `fragments`), catalog and
/// parameter entries. The caller is responsible for the registry.
pub fn scaffold(
    sandbox: &Sandbox,
    layout: &ProjectLayout,
    pipeline: &str,
    fragments: &[Mapping],
) -> Result<()> {
    sandbox.write("data/input.csv", SAMPLE_CSV)?;

    let mut definition = default_definition(pipeline);
    for fragment in fragments {
        yaml::merge_mappings(&mut definition, fragment.clone());
    }
    let definition_path = sandbox.resolve(layout.pipeline_file(pipeline))?;
    yaml::write_mapping(definition_path, &definition)?;

    yaml::update_mapping(sandbox.resolve(CATALOG_PATH)?, &catalog_entries(pipeline))?;
    yaml::update_mapping(sandbox.resolve(PARAMETERS_PATH)?, &parameter_entries(pipeline))?;

    debug!(pipeline, "pipeline scaffolded");
    Ok(())
}
