//! Loading parsed modules from JSON files

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tspec_analysis::Project;
use tspec_ast::Module;

use crate::error::CliError;

/// The source text behind a module, found next to its JSON file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: Option<String>,
}

impl SourceFile {
    /// Returns the path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the source text, if the file could be read
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Modules loaded into a fresh project
#[derive(Debug)]
pub struct LoadedProject {
    /// The loaded modules
    pub project: Project,
    /// Keyed by the file name recorded in each module
    pub sources: IndexMap<PathBuf, SourceFile>,
}

impl LoadedProject {
    /// Returns the source behind a module file name, if it was loaded
    pub fn source(&self, file: &Path) -> Option<&SourceFile> {
        self.sources.get(file)
    }
}

/// Parses one module from its JSON text
pub fn parse_module(path: &Path, text: &str) -> Result<Module, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a module from a JSON file
pub fn read_module(path: &Path) -> Result<Module, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_module(path, &text)
}

/// Locates the source file a module was parsed from
///
/// Relative names are taken relative to the JSON file. A missing source is
/// not an error; diagnostics are then printed without source lines.
pub fn find_source(json_path: &Path, module: &Module) -> SourceFile {
    let path = if module.file().is_relative() {
        json_path
            .parent()
            .map_or_else(|| module.file().to_path_buf(), |dir| dir.join(module.file()))
    } else {
        module.file().to_path_buf()
    };

    let text = fs::read_to_string(&path).ok();
    if text.is_none() {
        tracing::debug!(path = %path.display(), "source text not available");
    }

    SourceFile { path, text }
}

/// Reads every module and adds it to a new project
pub fn load_project(files: &[PathBuf]) -> Result<LoadedProject, CliError> {
    let mut project = Project::new();
    let mut sources = IndexMap::new();

    for path in files {
        let module = read_module(path)?;
        let name = module.name().to_string();

        if project.module_id(&name).is_some() {
            tracing::warn!(module = %name, file = %path.display(), "module loaded more than once, keeping the last");
        }

        sources.insert(module.file().to_path_buf(), find_source(path, &module));
        project.add_module(module);
        tracing::debug!(module = %name, file = %path.display(), "loaded module");
    }

    Ok(LoadedProject { project, sources })
}

#[cfg(test)]
mod tests {
    use tspec_ast::construct::{ModuleBuilder, ty, value};

    use super::*;

    #[test]
    fn modules_survive_json() {
        let module = ModuleBuilder::ttcn("Limits")
            .constant("max", ty::integer(), value::integer(10))
            .build();
        let text = serde_json::to_string(&module).expect("module serializes");

        let parsed = parse_module(Path::new("Limits.json"), &text).expect("module parses");

        assert_eq!(parsed, module);
    }

    #[test]
    fn invalid_json_names_the_file() {
        let error = parse_module(Path::new("broken.json"), "{").expect_err("input is truncated");

        assert!(matches!(&error, CliError::Parse { path, .. } if path == Path::new("broken.json")));
        assert!(error.to_string().starts_with("`broken.json` is not a valid module"));
    }

    #[test]
    fn sources_are_found_next_to_the_json_file() {
        let module = ModuleBuilder::ttcn("Limits").build();

        let source = find_source(Path::new("does/not/exist/Limits.json"), &module);

        assert_eq!(source.path(), Path::new("does/not/exist/Limits.ttcn"));
        assert_eq!(source.text(), None);
    }
}
