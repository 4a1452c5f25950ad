use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::cli::Cli;
use crate::commands::{resolve_key, resolve_simulator_bin, resolve_tool_bin};
use crate::config::Config;
use crate::keys::PrivateKey;
use crate::script;
use crate::simulator::{self, Simulator};
use crate::toolchain::{self, ProcessRunner, ToolRunner};

/// How one script invocation runs, decided from the endpoint and
/// broadcast flags alone.
#[derive(Debug, PartialEq)]
enum Mode<'a> {
	/// No endpoint given: run against a disposable local simulator,
	/// broadcasting with its pre-funded dev key, then tear it down.
	Ephemeral,
	/// Endpoint given, no --broadcast: the tool only simulates.
	Simulate(&'a str),
	/// Endpoint and --broadcast: real transactions, key required.
	Broadcast(&'a str),
}

fn decide_mode(rpc_url: Option<&str>, broadcast: bool) -> Mode<'_> {
	match (rpc_url, broadcast) {
		(None, _) => Mode::Ephemeral,
		(Some(url), false) => Mode::Simulate(url),
		(Some(url), true) => Mode::Broadcast(url),
	}
}

pub async fn run(
	cli: &Cli,
	path: &Path,
	broadcast: bool,
	private_key: Option<&str>,
	interactive: bool,
) -> Result<()> {
	let config = Config::load()?;
	let tool_bin = resolve_tool_bin(cli, &config);

	// Pre-flight lint: suffix convention plus broadcast-region shape.
	let report = script::lint_file(path)?;
	for warning in &report.warnings {
		eprintln!("warning: {warning}");
	}

	let runner = ProcessRunner;
	match decide_mode(cli.rpc_url.as_deref(), broadcast) {
		Mode::Ephemeral => {
			let sim_bin = resolve_simulator_bin(cli, &config);
			let timeout = Duration::from_secs(config.toolchain.startup_timeout_secs);

			let sim = Simulator::spawn_ephemeral(&sim_bin, timeout).await?;
			println!("Started disposable simulator at {}", sim.url());

			let key = PrivateKey::parse(simulator::DEV_ACCOUNT_KEY)?;
			let result = execute(&runner, &tool_bin, path, Some(sim.url()), Some(&key)).await;

			if let Err(e) = sim.shutdown().await {
				eprintln!("warning: failed to stop simulator: {e}");
			} else {
				println!("Simulator torn down.");
			}
			result
		}
		Mode::Simulate(url) => {
			println!("Simulating only (pass --broadcast to submit real transactions)...");
			execute(&runner, &tool_bin, path, Some(url), None).await
		}
		Mode::Broadcast(url) => {
			let key = resolve_key(private_key, interactive)?;
			execute(&runner, &tool_bin, path, Some(url), Some(&key)).await
		}
	}
}

/// One tool invocation; the tool's own report is passed through.
async fn execute(
	runner: &dyn ToolRunner,
	tool_bin: &str,
	path: &Path,
	rpc_url: Option<&str>,
	key: Option<&PrivateKey>,
) -> Result<()> {
	let args = toolchain::script_args(path, rpc_url, key);
	let output = runner.run(tool_bin, &args).await?;
	print!("{}", output.stdout);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::toolchain::{ToolError, ToolOutput};
	use async_trait::async_trait;
	use std::sync::Mutex;

	#[test]
	fn mode_decision_table() {
		let url = "http://localhost:8545/";
		assert_eq!(decide_mode(None, false), Mode::Ephemeral);
		assert_eq!(decide_mode(None, true), Mode::Ephemeral);
		assert_eq!(decide_mode(Some(url), false), Mode::Simulate(url));
		assert_eq!(decide_mode(Some(url), true), Mode::Broadcast(url));
	}

	#[derive(Default)]
	struct RecordingRunner {
		calls: Mutex<Vec<(String, Vec<String>)>>,
	}

	#[async_trait]
	impl ToolRunner for RecordingRunner {
		async fn run(&self, bin: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
			self.calls
				.lock()
				.unwrap()
				.push((bin.to_owned(), args.to_vec()));
			Ok(ToolOutput {
				stdout: "Script ran successfully.\n".into(),
				stderr: String::new(),
			})
		}
	}

	#[tokio::test]
	async fn simulate_mode_passes_no_broadcast_flag_or_key() {
		let runner = RecordingRunner::default();
		execute(
			&runner,
			"forge",
			Path::new("script/DeployCounter.s.sol"),
			Some("http://localhost:8545/"),
			None,
		)
		.await
		.unwrap();

		let calls = runner.calls.lock().unwrap();
		let (bin, args) = &calls[0];
		assert_eq!(bin, "forge");
		assert_eq!(args[0], "script");
		assert!(!args.contains(&"--broadcast".to_owned()));
		assert!(!args.contains(&"--private-key".to_owned()));
	}

	#[tokio::test]
	async fn broadcast_mode_passes_flag_and_key() {
		let runner = RecordingRunner::default();
		let key = PrivateKey::parse(simulator::DEV_ACCOUNT_KEY).unwrap();
		execute(
			&runner,
			"forge",
			Path::new("script/DeployCounter.s.sol"),
			Some("http://localhost:8545/"),
			Some(&key),
		)
		.await
		.unwrap();

		let calls = runner.calls.lock().unwrap();
		let args = &calls[0].1;
		assert!(args.contains(&"--broadcast".to_owned()));
		assert!(args.contains(&key.to_hex()));
	}
}
