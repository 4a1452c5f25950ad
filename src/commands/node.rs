use anyhow::Result;

use crate::cli::Cli;
use crate::commands::resolve_simulator_bin;
use crate::config::Config;
use crate::simulator;

pub async fn run(cli: &Cli, port: u16) -> Result<()> {
	let config = Config::load()?;
	let bin = resolve_simulator_bin(cli, &config);

	println!("Starting local simulator on port {port} (Ctrl-C to stop)...");
	simulator::run_foreground(&bin, port).await
}
