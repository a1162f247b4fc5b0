mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use uot_cli::{Cli, verbosity_to_log_level};

#[tokio::main]
async fn main() -> Result<()> {
    // Bare `uot` prints help instead of waiting on stdin.
    if std::env::args().len() == 1 {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        return Ok(());
    }

    let cli = Cli::parse();

    let log_level = verbosity_to_log_level(cli.verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if cli.install_models {
        commands::install::run().await
    } else if cli.list_pairs {
        commands::pairs::run()
    } else {
        commands::translate::run(
            cli.input_lang.as_deref(),
            cli.output_lang.as_deref(),
            &cli.text,
        )
        .await
    }
}
