use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

use apb::cli::{builtin_commands, CliError, RootDispatcher};
use apb::infrastructure::di::ServiceContainer;
use apb::infrastructure::traits::ReloadLevelControl;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload};

fn main() {
    let levels = setup_logging();
    let dispatcher = RootDispatcher::new(
        builtin_commands(),
        ServiceContainer::new(Arc::new(levels)),
    );

    if let Err(e) = dispatcher.run(std::env::args_os()) {
        match &e {
            // clap renders its own usage message
            CliError::Args(clap_err) => {
                let _ = clap_err.print();
            }
            _ => error!("{}", e),
        }
        process::exit(e.exit_code());
    }
}

/// Install the stderr logger at info level and return a handle that can
/// raise it later (`--verbose`).
fn setup_logging() -> ReloadLevelControl {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    ReloadLevelControl::new(handle)
}
