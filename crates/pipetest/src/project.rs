//! Minimal project scaffolding following the framework's expected layout.
//!
//! A scaffolded project looks like:
//!
//! ```text
//! ├── pipeline.toml
//! ├── conf
//! │   ├── base
//! │   │   ├── catalog.yml
//! │   │   └── parameters.yml
//! │   └── local
//! ├── data
//! └── src
//!     └── <name>
//!         ├── pipelines
//!         └── registry.yml
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::error::Result;
use crate::sandbox::Sandbox;

/// Catalog file, relative to the project root.
pub const CATALOG_PATH: &str = "conf/base/catalog.yml";
/// Parameters file, relative to the project root.
pub const PARAMETERS_PATH: &str = "conf/base/parameters.yml";
/// Project manifest, relative to the project root.
pub const MANIFEST_PATH: &str = "pipeline.toml";

#[derive(Serialize)]
struct Manifest<'a> {
    project: ManifestProject<'a>,
}

#[derive(Serialize)]
struct ManifestProject<'a> {
    name: &'a str,
    version: &'a str,
}

/// Absolute-path handle to a scaffolded project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    name: String,
    root: PathBuf,
}

impl ProjectLayout {
    /// The project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The absolute project root (the sandbox root).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path to the catalog file.
    pub fn catalog(&self) -> PathBuf {
        self.root.join(CATALOG_PATH)
    }

    /// Absolute path to the parameters file.
    pub fn parameters(&self) -> PathBuf {
        self.root.join(PARAMETERS_PATH)
    }

    /// Pipeline definition file for `pipeline`, relative to the root.
    pub fn pipeline_file(&self, pipeline: &str) -> PathBuf {
        PathBuf::from(format!("src/{}/pipelines/{}.yml", self.name, pipeline))
    }

    /// Pipeline registry file, relative to the root.
    pub fn registry_file(&self) -> PathBuf {
        PathBuf::from(format!("src/{}/registry.yml", self.name))
    }
}

/// Create the minimal project tree inside `sandbox` and return its layout.
pub fn scaffold(sandbox: &Sandbox, name: &str) -> Result<ProjectLayout> {
    sandbox.mkdir("conf/base")?;
    sandbox.mkdir("conf/local")?;
    sandbox.mkdir("data")?;
    sandbox.mkdir(format!("src/{name}/pipelines"))?;

    let manifest = Manifest {
        project: ManifestProject {
            name,
            version: env!("CARGO_PKG_VERSION"),
        },
    };
    let manifest_text = toml::to_string(&manifest)
        .map_err(|e| crate::error::YamlError::Serialize(e.to_string()))?;
    sandbox.write(MANIFEST_PATH, &manifest_text)?;

    sandbox.touch(CATALOG_PATH)?;
    sandbox.touch(PARAMETERS_PATH)?;

    let layout = ProjectLayout {
        name: name.to_string(),
        root: sandbox.root().to_path_buf(),
    };
    write_registry(sandbox, &layout, &[])?;

    info!(project = name, root = %layout.root().display(), "project scaffolded");
    Ok(layout)
}

/// Rewrite the pipeline registry listing the given pipelines.
pub fn write_registry(sandbox: &Sandbox, layout: &ProjectLayout, pipelines: &[String]) -> Result<()> {
    let mut registry = Mapping::new();
    registry.insert(
        Value::from("pipelines"),
        Value::Sequence(pipelines.iter().map(|p| Value::from(p.as_str())).collect()),
    );
    let path = sandbox.resolve(layout.registry_file())?;
    crate::yaml::write_mapping(path, &registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_creates_expected_tree() {
        let sandbox = Sandbox::new().unwrap();
        let layout = scaffold(&sandbox, "my_project").unwrap();

        assert!(sandbox.exists("conf/base/catalog.yml"));
        assert!(sandbox.exists("conf/base/parameters.yml"));
        assert!(sandbox.exists("conf/local"));
        assert!(sandbox.exists("data"));
        assert!(sandbox.exists("pipeline.toml"));
        assert!(sandbox.exists("src/my_project/pipelines"));
        assert!(sandbox.exists("src/my_project/registry.yml"));
        assert_eq!(layout.name(), "my_project");
        assert_eq!(layout.root(), sandbox.root());
    }

    #[test]
    fn manifest_carries_project_name_and_version() {
        let sandbox = Sandbox::new().unwrap();
        scaffold(&sandbox, "proj").unwrap();

        let manifest: toml::Value = toml::from_str(&sandbox.read("pipeline.toml").unwrap()).unwrap();
        assert_eq!(
            manifest["project"]["name"].as_str(),
            Some("proj")
        );
        assert_eq!(
            manifest["project"]["version"].as_str(),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn fresh_catalog_reads_as_empty_mapping() {
        let sandbox = Sandbox::new().unwrap();
        let layout = scaffold(&sandbox, "proj").unwrap();

        let catalog = crate::yaml::read_mapping(layout.catalog()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn registry_starts_empty() {
        let sandbox = Sandbox::new().unwrap();
        let layout = scaffold(&sandbox, "proj").unwrap();

        let registry = crate::yaml::read_mapping(sandbox.resolve(layout.registry_file()).unwrap()).unwrap();
        let pipelines = registry.get("pipelines").unwrap();
        assert_eq!(pipelines, &Value::Sequence(vec![]));
    }
}
