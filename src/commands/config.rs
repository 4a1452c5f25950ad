use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::Config;

pub fn run(cmd: &ConfigCommand) -> Result<()> {
	match cmd {
		ConfigCommand::Show => show(),
		ConfigCommand::Set {
			rpc_url,
			tool_bin,
			simulator_bin,
		} => set(rpc_url.as_deref(), tool_bin.as_deref(), simulator_bin.as_deref()),
	}
}

fn show() -> Result<()> {
	let config = Config::load()?;

	println!("Config file: {}", Config::path().display());
	println!("  RPC URL:      {}", config.network.rpc_url);
	println!("  Tool:         {}", config.toolchain.tool_bin);
	println!("  Simulator:    {}", config.toolchain.simulator_bin);
	println!("  Startup wait: {}s", config.toolchain.startup_timeout_secs);
	Ok(())
}

fn set(rpc_url: Option<&str>, tool_bin: Option<&str>, simulator_bin: Option<&str>) -> Result<()> {
	let mut config = Config::load()?;

	if !apply(&mut config, rpc_url, tool_bin, simulator_bin) {
		anyhow::bail!(
			"Nothing to set. Pass --rpc-url, --tool-bin, or --simulator-bin."
		);
	}

	config.save()?;
	println!("Saved {}", Config::path().display());
	Ok(())
}

/// Apply the given overrides; true if anything changed.
fn apply(
	config: &mut Config,
	rpc_url: Option<&str>,
	tool_bin: Option<&str>,
	simulator_bin: Option<&str>,
) -> bool {
	let mut changed = false;
	if let Some(url) = rpc_url {
		config.network.rpc_url = url.to_owned();
		changed = true;
	}
	if let Some(bin) = tool_bin {
		config.toolchain.tool_bin = bin.to_owned();
		changed = true;
	}
	if let Some(bin) = simulator_bin {
		config.toolchain.simulator_bin = bin.to_owned();
		changed = true;
	}
	changed
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn apply_overrides_only_what_is_given() {
		let mut config = Config::default();
		assert!(apply(&mut config, Some("http://localhost:9999/"), None, None));
		assert_eq!(config.network.rpc_url, "http://localhost:9999/");
		assert_eq!(config.toolchain.tool_bin, "forge");
	}

	#[test]
	fn apply_with_nothing_to_set_reports_no_change() {
		let mut config = Config::default();
		assert!(!apply(&mut config, None, None, None));
	}
}
