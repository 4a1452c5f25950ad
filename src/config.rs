use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent CLI settings.
///
/// Deliberately has no field for a signing key: keys are only ever taken
/// from a flag or an interactive prompt and are never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub network: NetworkConfig,
	pub toolchain: ToolchainConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
	/// Default RPC endpoint when --rpc-url is not given to commands that
	/// need one.
	pub rpc_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
	/// Compiler/deployer binary, resolved through PATH.
	pub tool_bin: String,
	/// Local chain simulator binary, resolved through PATH.
	pub simulator_bin: String,
	/// How long to wait for a freshly spawned simulator to answer RPC.
	pub startup_timeout_secs: u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			network: NetworkConfig {
				rpc_url: "http://localhost:8545/".into(),
			},
			toolchain: ToolchainConfig {
				tool_bin: "forge".into(),
				simulator_bin: "anvil".into(),
				startup_timeout_secs: 15,
			},
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.soldeploy/).
	pub fn dir() -> PathBuf {
		dirs::home_dir()
			.expect("could not determine home directory")
			.join(".soldeploy")
	}

	/// Path to the config file.
	pub fn path() -> PathBuf {
		Self::dir().join("config.toml")
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		let path = Self::path();
		if path.exists() {
			let content = std::fs::read_to_string(&path)?;
			Ok(toml::from_str(&content)?)
		} else {
			Ok(Self::default())
		}
	}

	/// Persist the current config to disk, creating the directory if needed.
	pub fn save(&self) -> anyhow::Result<()> {
		self.write_to(&Self::path())
	}

	fn write_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, toml::to_string_pretty(self)?)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sensible() {
		let c = Config::default();
		assert_eq!(c.network.rpc_url, "http://localhost:8545/");
		assert_eq!(c.toolchain.tool_bin, "forge");
		assert_eq!(c.toolchain.simulator_bin, "anvil");
		assert!(c.toolchain.startup_timeout_secs > 0);
	}

	#[test]
	fn toml_roundtrip() {
		let mut c = Config::default();
		c.network.rpc_url = "http://localhost:9999/".into();
		c.toolchain.simulator_bin = "/opt/devnet/bin/anvil".into();

		let serialized = toml::to_string_pretty(&c).unwrap();
		let parsed: Config = toml::from_str(&serialized).unwrap();

		assert_eq!(parsed.network.rpc_url, "http://localhost:9999/");
		assert_eq!(parsed.toolchain.simulator_bin, "/opt/devnet/bin/anvil");
	}

	#[test]
	fn write_creates_directory_and_roundtrips() {
		let dir = std::env::temp_dir().join("soldeploy_config_test");
		std::fs::remove_dir_all(&dir).ok();
		let path = dir.join("nested").join("config.toml");

		let mut c = Config::default();
		c.toolchain.tool_bin = "/opt/devnet/bin/forge".into();
		c.write_to(&path).unwrap();

		let content = std::fs::read_to_string(&path).unwrap();
		let parsed: Config = toml::from_str(&content).unwrap();
		std::fs::remove_dir_all(&dir).ok();

		assert_eq!(parsed.toolchain.tool_bin, "/opt/devnet/bin/forge");
	}

	#[test]
	fn config_schema_cannot_hold_a_key() {
		// A config file with a stray private_key field must be rejected,
		// not silently absorbed.
		let text = r#"
			[network]
			rpc_url = "http://localhost:8545/"
			private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"

			[toolchain]
			tool_bin = "forge"
			simulator_bin = "anvil"
			startup_timeout_secs = 15
		"#;
		assert!(toml::from_str::<Config>(text).is_err());
	}
}
