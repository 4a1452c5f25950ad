pub mod check;
pub mod config;
pub mod create;
pub mod node;
pub mod script;
pub mod tx;

use anyhow::Result;

use crate::cli::Cli;
use crate::config::Config;
use crate::keys::{self, PrivateKey};

/// Resolve the RPC URL from CLI flag or config.
pub fn resolve_rpc(cli: &Cli, config: &Config) -> String {
	cli.rpc_url
		.clone()
		.unwrap_or_else(|| config.network.rpc_url.clone())
}

/// Resolve the contract tool binary from CLI flag or config.
pub fn resolve_tool_bin(cli: &Cli, config: &Config) -> String {
	cli.tool_bin
		.clone()
		.unwrap_or_else(|| config.toolchain.tool_bin.clone())
}

/// Resolve the simulator binary from CLI flag or config.
pub fn resolve_simulator_bin(cli: &Cli, config: &Config) -> String {
	cli.simulator_bin
		.clone()
		.unwrap_or_else(|| config.toolchain.simulator_bin.clone())
}

/// Resolve the signing key from the flag or an interactive prompt,
/// failing before any process is spawned if neither is available.
pub fn resolve_key(private_key: Option<&str>, interactive: bool) -> Result<PrivateKey> {
	match private_key {
		Some(raw) => Ok(PrivateKey::parse(raw)?),
		None if interactive => keys::prompt_key(),
		None => anyhow::bail!(
			"No signing key. Pass --private-key <KEY> or --interactive."
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_key_is_an_early_error() {
		let err = resolve_key(None, false).unwrap_err();
		assert!(err.to_string().contains("--private-key"));
	}

	#[test]
	fn flag_key_is_parsed() {
		let key = resolve_key(
			Some("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"),
			false,
		)
		.unwrap();
		assert!(key.to_hex().starts_with("0xac0974"));
	}

	#[test]
	fn malformed_flag_key_is_rejected() {
		assert!(resolve_key(Some("0x1234"), false).is_err());
	}
}
