//! Command tree and root dispatcher
//!
//! Commands implement [`Command`] and are registered into a [`CommandTree`].
//! The [`RootDispatcher`] parses the command line, bootstraps configuration
//! once, runs the pre-run hook and then the selected command.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{ArgMatches, FromArgMatches};
use tracing::debug;
use tracing::level_filters::LevelFilter;

use crate::application::AppContext;
use crate::cli::args::{root_command, GlobalArgs};
use crate::cli::{CliError, CliResult};
use crate::domain::GlobalOptions;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// A named unit of CLI functionality.
pub trait Command: Send + Sync {
    /// Subcommand name as typed on the command line.
    fn name(&self) -> &'static str;

    /// One-line help text.
    fn about(&self) -> &'static str {
        ""
    }

    /// Flag set of this command. Subcommands are attached by the tree.
    fn definition(&self) -> clap::Command {
        clap::Command::new(self.name()).about(self.about())
    }

    /// Nested commands, if this is a group.
    fn subcommands(&self) -> Vec<Box<dyn Command>> {
        Vec::new()
    }

    /// Execute with the per-run context and this command's own matches.
    fn run(&self, _ctx: &AppContext, _matches: &ArgMatches) -> CliResult<()> {
        Err(CliError::Usage(format!("'{}' requires a subcommand", self.name())))
    }
}

struct CommandNode {
    command: Box<dyn Command>,
    children: Vec<CommandNode>,
}

impl CommandNode {
    fn new(command: Box<dyn Command>) -> Self {
        let children = command
            .subcommands()
            .into_iter()
            .map(CommandNode::new)
            .collect();
        Self { command, children }
    }

    fn build(&self) -> clap::Command {
        self.command
            .definition()
            .subcommands(self.children.iter().map(CommandNode::build))
    }
}

/// Where the command line led inside the tree.
pub struct Resolved<'a> {
    /// Names from the root to the selected command
    pub path: Vec<&'static str>,
    /// Selected command, `None` if no subcommand was given
    command: Option<&'a CommandNode>,
    /// Matches of the selected command
    pub matches: &'a ArgMatches,
}

impl<'a> Resolved<'a> {
    /// The command to run, or `None` when only help can be shown.
    pub fn runnable(&self) -> Option<&'a dyn Command> {
        self.command
            .filter(|node| node.children.is_empty())
            .map(|node| node.command.as_ref())
    }
}

/// Registry of top-level commands. Names must be unique per level.
#[derive(Default)]
pub struct CommandTree {
    roots: Vec<CommandNode>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level command (and its subcommands).
    pub fn register(&mut self, command: Box<dyn Command>) -> &mut Self {
        debug!("register command: {}", command.name());
        self.roots.push(CommandNode::new(command));
        self
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Mount every registered command under `root`.
    pub fn build(&self, root: clap::Command) -> clap::Command {
        root.subcommands(self.roots.iter().map(CommandNode::build))
    }

    /// Walk `matches` down the tree as far as registered commands go.
    pub fn resolve<'a>(&'a self, matches: &'a ArgMatches) -> Resolved<'a> {
        let mut path = Vec::new();
        let mut level = &self.roots;
        let mut command = None;
        let mut current = matches;

        while let Some((name, sub)) = current.subcommand() {
            let Some(node) = level.iter().find(|n| n.command.name() == name) else {
                break;
            };
            path.push(node.command.name());
            command = Some(node);
            level = &node.children;
            current = sub;
        }

        Resolved {
            path,
            command,
            matches: current,
        }
    }
}

/// Owns the global flags and drives a single process invocation.
pub struct RootDispatcher {
    tree: CommandTree,
    services: ServiceContainer,
}

impl RootDispatcher {
    pub fn new(tree: CommandTree, services: ServiceContainer) -> Self {
        Self { tree, services }
    }

    /// The full clap command: root flags plus the registered tree.
    pub fn command(&self) -> clap::Command {
        self.tree.build(root_command())
    }

    /// Parse `args`, bootstrap configuration, run the pre-run hook and the
    /// selected command.
    ///
    /// `--help`, `--version` and a group without a subcommand print help and
    /// return `Ok` without touching configuration.
    pub fn run<I, T>(&self, args: I) -> CliResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cli = self.command();
        let matches = match cli.try_get_matches_from_mut(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.print().map_err(|e| InfraError::io("write help", e))?;
                return Ok(());
            }
            Err(e) => return Err(CliError::Args(e)),
        };

        let options = GlobalArgs::from_arg_matches(&matches)?.into_options();
        let resolved = self.tree.resolve(&matches);

        let Some(command) = resolved.runnable() else {
            return print_help(&mut cli, &resolved.path);
        };

        // init hook
        let bootstrapped = self.services.config_resolver().bootstrap(&options)?;
        let ctx = AppContext::new(options, bootstrapped, cli.clone());

        self.pre_run(&ctx.options)?;

        debug!(
            "run: {} (config {})",
            resolved.path.join(" "),
            ctx.location.path.display()
        );
        command.run(&ctx, resolved.matches)
    }

    /// Raise the log level to debug when `--verbose` is set.
    pub fn pre_run(&self, options: &GlobalOptions) -> CliResult<()> {
        if options.verbose {
            self.services.levels.set_level(LevelFilter::DEBUG)?;
            debug!("Debug mode: debug");
        }
        Ok(())
    }
}

fn print_help(cli: &mut clap::Command, path: &[&str]) -> CliResult<()> {
    let mut target = cli;
    for name in path {
        target = target
            .find_subcommand_mut(name)
            .ok_or_else(|| CliError::Usage(format!("unknown command: {name}")))?;
    }
    target
        .print_help()
        .map_err(|e| InfraError::io("write help", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::config::EnvSource;
    use crate::infrastructure::traits::RealFileSystem;
    use crate::util::testing::{init_test_setup, FixedHomeDir, RecordingLevelControl};

    struct Probe {
        runs: Arc<AtomicUsize>,
    }

    impl Command for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn run(&self, ctx: &AppContext, _matches: &ArgMatches) -> CliResult<()> {
            assert!(ctx.location.path.exists());
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl Command for Failing {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn run(&self, _ctx: &AppContext, _matches: &ArgMatches) -> CliResult<()> {
            Err(CliError::command("fail", "boom"))
        }
    }

    struct Group;

    impl Command for Group {
        fn name(&self) -> &'static str {
            "group"
        }

        fn subcommands(&self) -> Vec<Box<dyn Command>> {
            vec![Box::new(Failing)]
        }
    }

    struct Fixture {
        _home: TempDir,
        home_path: std::path::PathBuf,
        runs: Arc<AtomicUsize>,
        levels: Arc<RecordingLevelControl>,
        dispatcher: RootDispatcher,
    }

    fn fixture() -> Fixture {
        init_test_setup();
        let home = TempDir::new().unwrap();
        let home_path = home.path().to_path_buf();
        let runs = Arc::new(AtomicUsize::new(0));
        let levels = Arc::new(RecordingLevelControl::default());

        let mut tree = CommandTree::new();
        tree.register(Box::new(Probe {
            runs: Arc::clone(&runs),
        }))
        .register(Box::new(Failing))
        .register(Box::new(Group));

        let services = ServiceContainer::with_deps(
            Arc::new(RealFileSystem),
            Arc::new(FixedHomeDir::at(&home_path)),
            levels.clone(),
        )
        .with_env(EnvSource::Disabled);

        Fixture {
            _home: home,
            home_path,
            runs,
            levels,
            dispatcher: RootDispatcher::new(tree, services),
        }
    }

    #[test]
    fn verify_cli() {
        fixture().dispatcher.command().debug_assert();
    }

    #[test]
    fn given_registered_command_when_run_then_bootstraps_and_runs_once() {
        let f = fixture();

        f.dispatcher.run(["apb", "probe"]).unwrap();

        assert_eq!(f.runs.load(Ordering::SeqCst), 1);
        assert!(f.home_path.join(".apb.json").exists());
        assert!(f.levels.recorded().is_empty());
    }

    #[test]
    fn given_verbose_flag_when_run_then_raises_level_to_debug() {
        let f = fixture();

        f.dispatcher.run(["apb", "probe", "-v"]).unwrap();

        assert_eq!(f.levels.recorded(), vec![LevelFilter::DEBUG]);
    }

    #[test]
    fn given_no_subcommand_when_run_then_prints_help_without_bootstrap() {
        let f = fixture();

        f.dispatcher.run(["apb"]).unwrap();

        assert!(!f.home_path.join(".apb.json").exists());
        assert_eq!(f.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn given_group_without_subcommand_when_run_then_prints_help() {
        let f = fixture();

        f.dispatcher.run(["apb", "group"]).unwrap();

        assert!(!f.home_path.join(".apb.json").exists());
    }

    #[test]
    fn given_nested_failing_command_when_run_then_returns_command_error() {
        let f = fixture();

        let err = f.dispatcher.run(["apb", "group", "fail"]).unwrap_err();

        assert!(matches!(err, CliError::Command { .. }));
        assert_eq!(err.exit_code(), crate::exitcode::SOFTWARE);
    }

    #[test]
    fn given_unknown_flag_when_run_then_args_error_before_bootstrap() {
        let f = fixture();

        let err = f.dispatcher.run(["apb", "probe", "--nope"]).unwrap_err();

        assert!(matches!(err, CliError::Args(_)));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert!(!f.home_path.join(".apb.json").exists());
    }

    #[test]
    fn given_malformed_explicit_config_when_run_then_fails_before_command() {
        let f = fixture();
        let bad = f.home_path.join("bad.json");
        std::fs::write(&bad, "{not valid json").unwrap();

        let err = f
            .dispatcher
            .run(["apb", "--config", bad.to_str().unwrap(), "probe"])
            .unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
        assert_eq!(f.runs.load(Ordering::SeqCst), 0);
        assert!(!f.home_path.join(".apb.json").exists());
    }

    #[test]
    fn given_help_flag_when_run_then_ok_without_bootstrap() {
        let f = fixture();

        f.dispatcher.run(["apb", "--help"]).unwrap();

        assert!(!f.home_path.join(".apb.json").exists());
    }
}
