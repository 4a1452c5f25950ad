use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::keys::PrivateKey;

#[derive(Debug, Error)]
pub enum ToolError {
	#[error("failed to launch `{bin}`: {source}")]
	Launch {
		bin: String,
		#[source]
		source: std::io::Error,
	},
	/// The tool owns error classification (bad RPC URL, compiler errors,
	/// version mismatches); its message is passed through verbatim.
	#[error("`{bin}` exited with status {code}:\n{stderr}")]
	Failed {
		bin: String,
		code: i32,
		stderr: String,
	},
}

/// Captured output of one successful tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
	pub stdout: String,
	pub stderr: String,
}

/// Boundary to the external tool binary.  A trait so command flows can
/// be exercised in tests without the binary installed.
#[async_trait]
pub trait ToolRunner: Send + Sync {
	async fn run(&self, bin: &str, args: &[String]) -> Result<ToolOutput, ToolError>;
}

/// Runs the tool as a real subprocess, capturing stdout and stderr.
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
	async fn run(&self, bin: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
		let output = tokio::process::Command::new(bin)
			.args(args)
			.output()
			.await
			.map_err(|source| ToolError::Launch {
				bin: bin.to_owned(),
				source,
			})?;

		let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
		let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

		if output.status.success() {
			Ok(ToolOutput { stdout, stderr })
		} else {
			Err(ToolError::Failed {
				bin: bin.to_owned(),
				code: output.status.code().unwrap_or(-1),
				stderr,
			})
		}
	}
}

/// Argument set for the flag-based create flow:
/// `create <ContractName> --rpc-url URL --private-key KEY`.
pub fn create_args(
	contract: &str,
	rpc_url: &str,
	key: &PrivateKey,
	constructor_args: &[String],
) -> Vec<String> {
	let mut args = vec![
		"create".to_owned(),
		contract.to_owned(),
		"--rpc-url".to_owned(),
		rpc_url.to_owned(),
		"--private-key".to_owned(),
		key.to_hex(),
	];
	if !constructor_args.is_empty() {
		args.push("--constructor-args".to_owned());
		args.extend(constructor_args.iter().cloned());
	}
	args
}

/// Argument set for the script flow:
/// `script <path> [--rpc-url URL] [--broadcast --private-key KEY]`.
///
/// Passing a key implies broadcast; without one the tool only simulates.
pub fn script_args(path: &Path, rpc_url: Option<&str>, key: Option<&PrivateKey>) -> Vec<String> {
	let mut args = vec!["script".to_owned(), path.to_string_lossy().into_owned()];
	if let Some(url) = rpc_url {
		args.push("--rpc-url".to_owned());
		args.push(url.to_owned());
	}
	if let Some(key) = key {
		args.push("--broadcast".to_owned());
		args.push("--private-key".to_owned());
		args.push(key.to_hex());
	}
	args
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_key() -> PrivateKey {
		PrivateKey::parse("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
			.unwrap()
	}

	#[test]
	fn create_argv_shape() {
		let args = create_args("src/Counter.sol:Counter", "http://localhost:8545/", &test_key(), &[]);
		assert_eq!(args[0], "create");
		assert_eq!(args[1], "src/Counter.sol:Counter");
		assert!(args.contains(&"--rpc-url".to_owned()));
		assert!(args.contains(&"--private-key".to_owned()));
		assert!(!args.contains(&"--constructor-args".to_owned()));
	}

	#[test]
	fn create_argv_appends_constructor_args() {
		let ctor = vec!["42".to_owned(), "0xdead".to_owned()];
		let args = create_args("Counter", "http://localhost:8545/", &test_key(), &ctor);
		let pos = args.iter().position(|a| a == "--constructor-args").unwrap();
		assert_eq!(&args[pos + 1..], &["42", "0xdead"]);
	}

	#[test]
	fn script_argv_simulate_only() {
		let args = script_args(
			Path::new("script/DeployCounter.s.sol"),
			Some("http://localhost:8545/"),
			None,
		);
		assert!(!args.contains(&"--broadcast".to_owned()));
		assert!(!args.contains(&"--private-key".to_owned()));
	}

	#[test]
	fn script_argv_with_broadcast() {
		let key = test_key();
		let args = script_args(
			Path::new("script/DeployCounter.s.sol"),
			Some("http://localhost:8545/"),
			Some(&key),
		);
		let pos = args.iter().position(|a| a == "--broadcast").unwrap();
		assert_eq!(args[pos + 1], "--private-key");
		assert_eq!(args[pos + 2], key.to_hex());
	}

	#[test]
	fn script_argv_without_endpoint() {
		let args = script_args(Path::new("script/DeployCounter.s.sol"), None, None);
		assert_eq!(args, vec!["script", "script/DeployCounter.s.sol"]);
	}

	#[tokio::test]
	async fn launch_failure_names_the_binary() {
		let err = ProcessRunner
			.run("soldeploy-no-such-binary", &[])
			.await
			.unwrap_err();
		assert!(matches!(err, ToolError::Launch { .. }));
		assert!(err.to_string().contains("soldeploy-no-such-binary"));
	}
}
