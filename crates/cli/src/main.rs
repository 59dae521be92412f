use std::process::ExitCode;

use clap::Parser;
use slotbook_cli::{cli::Cli, commands, logging};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match commands::dispatch(cli.command).await {
		Ok(code) => ExitCode::from(code),
		Err(err) => {
			error!(target = "slotbook", error = %err, "command failed");
			println!("error: {err}");
			ExitCode::from(err.exit_code())
		}
	}
}
