//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::BuildOutcome;
use crate::application::{Renderer, TreeRenderer, XmlRenderer};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `claimdoc --help`".into(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let settings = Settings::load(Some(project_dir.as_path()))?;
    debug!(?settings, "settings loaded");
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Build {
            schema,
            values,
            output,
            pretty,
            no_declaration,
        } => cmd_build(
            &container,
            schema.as_deref(),
            values,
            output.as_deref(),
            *pretty,
            *no_declaration,
        ),
        Commands::Tree { schema, values } => cmd_tree(&container, schema.as_deref(), values),
        Commands::Check { schema } => cmd_check(&container, schema.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

/// `--schema` wins over the configured default.
fn resolve_schema(container: &ServiceContainer, explicit: Option<&Path>) -> CliResult<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| container.settings.schema.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no schema given: pass --schema or set `schema` in .claimdoc.toml".into(),
            )
        })
}

#[instrument(level = "debug", skip(container))]
fn cmd_build(
    container: &ServiceContainer,
    schema: Option<&Path>,
    values: &[PathBuf],
    output: Option<&Path>,
    pretty: bool,
    no_declaration: bool,
) -> CliResult<()> {
    let schema_path = resolve_schema(container, schema)?;
    let schema = container.documents.load_schema(&schema_path)?;

    let mut options = container.render_options();
    if pretty {
        options.pretty = true;
    }
    if no_declaration {
        options.xml_declaration = false;
    }
    let renderer = XmlRenderer::new(options);

    if let [source] = values {
        let document = container.documents.build(&schema, source)?;
        match output {
            Some(target) => {
                container
                    .documents
                    .write_rendered(&document, &renderer, target)?;
                output::success(&format!("{} -> {}", source.display(), target.display()));
            }
            None => output::info(&renderer.render(&document)?),
        }
        return Ok(());
    }

    let total = values.len();
    let failed = match output {
        Some(dir) => {
            if container.fs.is_file(dir) {
                return Err(CliError::InvalidArgs(format!(
                    "--output must be a directory when building several files: {}",
                    dir.display()
                )));
            }
            container.fs.create_dir_all(dir).map_err(|e| {
                InfraError::io(format!("create output directory {}", dir.display()), e)
            })?;
            report_batch(
                container
                    .documents
                    .write_batch(&schema, values, &renderer, dir),
                |source, target| {
                    output::success(&format!("{} -> {}", source.display(), target.display()))
                },
            )
        }
        None => report_batch(
            container
                .documents
                .build_batch(&schema, values)
                .into_iter()
                .map(|BuildOutcome { source, result }| BuildOutcome {
                    result: result.and_then(|document| renderer.render(&document)),
                    source,
                })
                .collect(),
            |_, xml| output::info(xml),
        ),
    };

    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

/// Print each outcome; returns the number of failures.
fn report_batch<T>(outcomes: Vec<BuildOutcome<T>>, on_success: impl Fn(&Path, &T)) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(value) => on_success(&outcome.source, value),
            Err(e) => {
                failed += 1;
                output::failure(e);
            }
        }
    }
    failed
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, schema: Option<&Path>, values: &Path) -> CliResult<()> {
    let schema_path = resolve_schema(container, schema)?;
    let schema = container.documents.load_schema(&schema_path)?;
    let document = container.documents.build(&schema, values)?;
    output::info(&TreeRenderer.render(&document)?);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, schema: Option<&Path>) -> CliResult<()> {
    let schema_path = resolve_schema(container, schema)?;
    let schema = container.documents.load_schema(&schema_path)?;

    output::success(&format!("{} is valid", schema_path.display()));
    output::detail(&format!(
        "root <{}> built from group '{}'",
        schema.root_name(),
        schema.group()
    ));

    for (name, entries) in schema.table().groups() {
        let nested = entries.iter().filter(|e| e.group.is_some()).count();
        output::detail(&format!(
            "{name}: {} entries, {nested} collections",
            entries.len()
        ));
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => output::detail(&describe_config_file(&path)),
                None => output::detail("global: (no config directory on this platform)"),
            }
            output::detail(&describe_config_file(&local_config_path(project_dir)));
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

fn describe_config_file(path: &Path) -> String {
    let state = if path.exists() { "found" } else { "missing" };
    format!("{} ({state})", path.display())
}
