use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod keys;
mod receipt;
mod rpc;
mod script;
mod simulator;
mod toolchain;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	match &cli.command {
		Command::Create {
			contract,
			private_key,
			interactive,
			constructor_args,
		} => {
			commands::create::run(
				&cli,
				contract,
				private_key.as_deref(),
				*interactive,
				constructor_args,
			)
			.await
		}
		Command::Script {
			path,
			broadcast,
			private_key,
			interactive,
		} => {
			commands::script::run(&cli, path, *broadcast, private_key.as_deref(), *interactive)
				.await
		}
		Command::Node { port } => commands::node::run(&cli, *port).await,
		Command::Check { path } => commands::check::run(path),
		Command::Tx { tx_hash } => commands::tx::run(&cli, tx_hash).await,
		Command::Config { command } => commands::config::run(command),
	}
}
