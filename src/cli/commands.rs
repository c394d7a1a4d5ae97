//! Built-in commands
//!
//! `config` inspects the loaded configuration, `completion` writes shell
//! completion scripts. Other commands register through [`CommandTree`].

use std::io;

use clap::{ArgMatches, Args, FromArgMatches};
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::AppContext;
use crate::cli::args::{CompletionArgs, ConfigGetArgs, BIN_NAME};
use crate::cli::dispatch::{Command, CommandTree};
use crate::cli::output;
use crate::cli::{CliError, CliResult};

/// Tree with every built-in command registered.
pub fn builtin_commands() -> CommandTree {
    let mut tree = CommandTree::new();
    tree.register(Box::new(ConfigCommand))
        .register(Box::new(CompletionCommand));
    tree
}

/// `apb config`: group for configuration inspection.
pub struct ConfigCommand;

impl Command for ConfigCommand {
    fn name(&self) -> &'static str {
        "config"
    }

    fn about(&self) -> &'static str {
        "Inspect the loaded configuration"
    }

    fn subcommands(&self) -> Vec<Box<dyn Command>> {
        vec![
            Box::new(ConfigShowCommand),
            Box::new(ConfigPathCommand),
            Box::new(ConfigGetCommand),
        ]
    }
}

/// `apb config show`: print the configuration as JSON.
pub struct ConfigShowCommand;

impl Command for ConfigShowCommand {
    fn name(&self) -> &'static str {
        "show"
    }

    fn about(&self) -> &'static str {
        "Show loaded config as JSON"
    }

    #[instrument(skip_all)]
    fn run(&self, ctx: &AppContext, _matches: &ArgMatches) -> CliResult<()> {
        output::info(&ctx.config.to_pretty_json()?);
        Ok(())
    }
}

/// `apb config path`: print where configuration was read from.
pub struct ConfigPathCommand;

impl Command for ConfigPathCommand {
    fn name(&self) -> &'static str {
        "path"
    }

    fn about(&self) -> &'static str {
        "Show config file path"
    }

    fn run(&self, ctx: &AppContext, _matches: &ArgMatches) -> CliResult<()> {
        output::info(&ctx.location.path.display());
        output::detail(&format!("source: {}", ctx.location.source));
        if ctx.created {
            output::action("Created", &ctx.location.path.display());
        }
        Ok(())
    }
}

/// `apb config get <key>`: print one value.
pub struct ConfigGetCommand;

impl Command for ConfigGetCommand {
    fn name(&self) -> &'static str {
        "get"
    }

    fn about(&self) -> &'static str {
        "Print the value at a dotted key"
    }

    fn definition(&self) -> clap::Command {
        ConfigGetArgs::augment_args(clap::Command::new(self.name()).about(self.about()))
    }

    #[instrument(skip_all)]
    fn run(&self, ctx: &AppContext, matches: &ArgMatches) -> CliResult<()> {
        let args = ConfigGetArgs::from_arg_matches(matches)?;
        debug!("key: {:?}", args.key);
        if args.key.trim().is_empty() {
            return Err(CliError::InvalidArgs("key must not be empty".into()));
        }

        let value = ctx
            .config
            .get(&args.key)
            .ok_or_else(|| CliError::Usage(format!("key not found: {}", args.key)))?;

        match value {
            Value::String(s) => output::info(s),
            other => output::info(&serde_json::to_string_pretty(other).map_err(|e| {
                CliError::command(self.name(), e)
            })?),
        }
        Ok(())
    }
}

/// `apb completion <shell>`: write a completion script to stdout.
pub struct CompletionCommand;

impl Command for CompletionCommand {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn about(&self) -> &'static str {
        "Generate shell completions"
    }

    fn definition(&self) -> clap::Command {
        CompletionArgs::augment_args(clap::Command::new(self.name()).about(self.about()))
    }

    fn run(&self, ctx: &AppContext, matches: &ArgMatches) -> CliResult<()> {
        let args = CompletionArgs::from_arg_matches(matches)?;
        debug!("Generating completion file for {:?}", args.shell);
        let mut cmd = ctx.cli.clone();
        generate(args.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::Bootstrapped;
    use crate::cli::args::root_command;
    use crate::domain::{ConfigLocation, ConfigSource, GlobalOptions, ProcessConfig};

    fn context(json: &str) -> AppContext {
        let tree = builtin_commands();
        AppContext::new(
            GlobalOptions::default(),
            Bootstrapped {
                location: ConfigLocation::new("/home/u/.apb.json", ConfigSource::Default),
                config: ProcessConfig::from_json_str(json).unwrap(),
                created: false,
            },
            tree.build(root_command()),
        )
    }

    fn matches_for(command: &dyn Command, args: &[&str]) -> ArgMatches {
        command
            .definition()
            .try_get_matches_from(args.iter().copied())
            .unwrap()
    }

    #[test]
    fn given_builtin_tree_then_registers_config_and_completion() {
        let tree = builtin_commands();
        assert_eq!(tree.len(), 2);
        tree.build(root_command()).debug_assert();
    }

    #[test]
    fn given_existing_key_when_config_get_then_ok() {
        let ctx = context(r#"{"registry": {"url": "https://r.example"}}"#);
        let matches = matches_for(&ConfigGetCommand, &["get", "registry.url"]);

        ConfigGetCommand.run(&ctx, &matches).unwrap();
    }

    #[test]
    fn given_missing_key_when_config_get_then_usage_error() {
        let ctx = context("{}");
        let matches = matches_for(&ConfigGetCommand, &["get", "nope"]);

        let err = ConfigGetCommand.run(&ctx, &matches).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_blank_key_when_config_get_then_invalid_args() {
        let ctx = context("{}");
        let matches = matches_for(&ConfigGetCommand, &["get", " "]);

        let err = ConfigGetCommand.run(&ctx, &matches).unwrap_err();

        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn given_context_when_config_show_and_path_then_ok() {
        let ctx = context(r#"{"a": 1}"#);
        let show = matches_for(&ConfigShowCommand, &["show"]);
        let path = matches_for(&ConfigPathCommand, &["path"]);

        ConfigShowCommand.run(&ctx, &show).unwrap();
        ConfigPathCommand.run(&ctx, &path).unwrap();
    }
}
