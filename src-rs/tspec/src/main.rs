//! Command line front end for the tspec toolchain

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tspec_analysis::{CancellationToken, Diagnostics, check_project};
use tspec_codegen::{GeneratorConfig, generate_project};
use tspec_shared::TspecError;

use crate::{
    command::{CliCommand, Commands, DevCommands},
    error::CliError,
    loader::LoadedProject,
};

mod command;
mod error;
mod loader;
mod print_error;
mod references;
mod stylesheet;

/// Whether a command found errors in the modules it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Clean,
    HasErrors,
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    if cli.no_colors {
        anstream::ColorChoice::Never.write_global();
    }
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { files } => check(&files, cli.print_debug),
        Commands::Generate {
            files,
            out_dir,
            package,
            indent,
            no_error_behavior,
        } => {
            let mut config = GeneratorConfig::new()
                .with_indent(indent)
                .with_error_behavior_tables(!no_error_behavior);
            if let Some(package) = package {
                config = config.with_package(package);
            }
            generate(&files, &out_dir, &config, cli.print_debug)
        }
        Commands::Dev { command } => match command {
            DevCommands::PrintReferences { file, definition } => {
                print_references(&file, definition.as_deref())
            }
        },
    };

    match result {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::HasErrors) => ExitCode::FAILURE,
        Err(error) => {
            print_error::print_cli_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(anstream::stderr)
        .with_target(false)
        .init();
}

/// Loads and checks every module, printing the diagnostics
fn load_and_check(files: &[PathBuf], print_debug: bool) -> Result<(LoadedProject, Outcome), CliError> {
    let mut loaded = loader::load_project(files)?;

    let report = check_project(&mut loaded.project, &CancellationToken::new());
    tracing::info!(modules = report.checked().len(), "checked project");

    let diagnostics = loaded.project.all_diagnostics();
    print_diagnostics(&loaded, &diagnostics, print_debug);

    let outcome = if diagnostics.has_errors() {
        Outcome::HasErrors
    } else {
        Outcome::Clean
    };
    Ok((loaded, outcome))
}

fn print_diagnostics(loaded: &LoadedProject, diagnostics: &Diagnostics, print_debug: bool) {
    for diagnostic in diagnostics {
        let source = loaded.source(diagnostic.file());
        let path = source.map_or_else(|| diagnostic.file().to_path_buf(), |source| source.path().to_path_buf());
        let error = TspecError::from_error_with_optional_source(
            diagnostic.error(),
            path,
            source.and_then(loader::SourceFile::text),
        );
        print_error::print(&error, print_debug);
    }

    let errors = diagnostics.errors().count();
    let warnings = diagnostics.warnings().count();
    if errors + warnings > 0 {
        print_error::print_note(&format!("{errors} error(s), {warnings} warning(s)"));
    }
}

fn check(files: &[PathBuf], print_debug: bool) -> Result<Outcome, CliError> {
    load_and_check(files, print_debug).map(|(_, outcome)| outcome)
}

/// Checks the modules and writes Java for every definition that is free of
/// errors
fn generate(
    files: &[PathBuf],
    out_dir: &Path,
    config: &GeneratorConfig,
    print_debug: bool,
) -> Result<Outcome, CliError> {
    let (loaded, outcome) = load_and_check(files, print_debug)?;

    fs::create_dir_all(out_dir).map_err(|source| CliError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    for unit in generate_project(&loaded.project, config) {
        for skipped in unit.skipped() {
            print_error::print_note(&format!("`{}` was not generated: {}", skipped.name(), skipped.reason()));
        }

        let path = out_dir.join(unit.file_name());
        fs::write(&path, unit.source()).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(file = %path.display(), "wrote generated source");
    }

    Ok(outcome)
}

fn print_references(file: &Path, definition: Option<&str>) -> Result<Outcome, CliError> {
    let module = loader::read_module(file)?;

    if let Some(name) = definition
        && !references::has_definition(&module, name)
    {
        return Err(CliError::NoSuchDefinition {
            path: file.to_path_buf(),
            name: name.to_string(),
        });
    }

    let source = loader::find_source(file, &module);
    anstream::print!("{}", references::listing(&module, source.text(), definition));
    Ok(Outcome::Clean)
}
