//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, Operation};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::{AccessSpec, DataTree, DomainError, TreeInput};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::TreeStore;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Plan { trees, access }) => cmd_plan(&container, trees, access.as_deref()),
        Some(Commands::Apply {
            operation,
            trees,
            access,
            json,
            output,
        }) => cmd_apply(
            &container,
            *operation,
            trees,
            access.as_deref(),
            *json,
            output.as_deref(),
        ),
        Some(Commands::Show { tree, json }) => cmd_show(&container, tree, *json),
        Some(Commands::Config { command }) => cmd_config(&container, cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "treehandler", &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

fn load_trees(container: &ServiceContainer, paths: &[PathBuf]) -> CliResult<Vec<DataTree<Value>>> {
    paths
        .iter()
        .map(|path| container.trees.load(path).map_err(CliError::from))
        .collect()
}

#[instrument(level = "debug", skip(container))]
fn cmd_plan(
    container: &ServiceContainer,
    paths: &[PathBuf],
    access: Option<&[AccessSpec]>,
) -> CliResult<()> {
    let trees = load_trees(container, paths)?;
    let access = access
        .map(<[AccessSpec]>::to_vec)
        .unwrap_or_else(|| vec![container.settings.default_access; trees.len()]);
    if access.len() != trees.len() {
        return Err(DomainError::AccessSpecArity {
            expected: trees.len(),
            found: access.len(),
        }
        .into());
    }

    let bound: Vec<_> = trees.iter().zip(access.iter().copied()).collect();
    let plan = container.matcher().plan(&bound)?;
    debug!("cmd_plan: {} steps", plan.len());

    output::info(&output::plan_view(&plan));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_apply(
    container: &ServiceContainer,
    operation: Operation,
    paths: &[PathBuf],
    access: Option<&[AccessSpec]>,
    json: bool,
    output_path: Option<&Path>,
) -> CliResult<()> {
    if paths.len() != operation.arity() {
        return Err(CliError::InvalidArgs(format!(
            "{} takes {} tree(s), got {}",
            operation,
            operation.arity(),
            paths.len()
        )));
    }
    let trees = load_trees(container, paths)?;
    let args: Vec<TreeInput<'_, Value>> = trees.iter().map(TreeInput::Tree).collect();

    let mut handler = operation.handler().with_options(container.settings.matching);
    let result = match access {
        Some(access) => handler.call_with_access(args, access),
        None => handler.call(args),
    }
    .map_err(ApplicationError::from)?;

    if let Some(path) = output_path {
        container.trees.save(path, &result)?;
        output::success(&format!("wrote {}", path.display()));
    }
    print_tree(container, operation.name(), &result, json)
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, path: &Path, json: bool) -> CliResult<()> {
    let tree = container.trees.load(path)?;
    print_tree(container, &path.display().to_string(), &tree, json)
}

fn print_tree(
    container: &ServiceContainer,
    label: &str,
    tree: &DataTree<Value>,
    json: bool,
) -> CliResult<()> {
    if json || container.settings.output.format == OutputFormat::Json {
        output::info(&TreeStore::to_json(tree)?);
    } else {
        if tree.is_empty() {
            output::warning("empty tree");
        }
        output::info(&output::tree_view(label, tree));
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", describe(container, &path))),
                None => output::detail("global: (no config directory)"),
            }
            let local = cli.config.clone().unwrap_or_else(local_config_path);
            output::detail(&format!("local:  {}", describe(container, &local)));
        }
    }
    Ok(())
}

fn describe(container: &ServiceContainer, path: &Path) -> String {
    if container.fs.exists(path) {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
