use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Result};
use rand::Rng;
use tokio::process::{Child, Command};
use tokio::time::Instant;

use crate::rpc::RpcClient;

/// Private key of the first pre-funded dev account every simulator
/// instance starts with.  Publicly known and only ever funded on
/// disposable local chains, so hard-coding it here is safe.
pub const DEV_ACCOUNT_KEY: &str =
	"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How many fresh ports to try before giving up on an ephemeral spawn.
const SPAWN_ATTEMPTS: usize = 3;

/// A local chain simulator child process.
///
/// The process is spawned with kill-on-drop, so a simulator launched
/// for one script execution can never outlive it, even on an early
/// error return.
#[derive(Debug)]
pub struct Simulator {
	child: Child,
	url: String,
	port: u16,
}

impl Simulator {
	/// Spawn a disposable simulator on a random high port, silenced,
	/// and wait until its RPC endpoint answers.  A port that turns out
	/// to be occupied makes the child exit early; retry on a fresh one.
	pub async fn spawn_ephemeral(bin: &str, startup_timeout: Duration) -> Result<Self> {
		let mut last_err = anyhow!("could not start simulator `{bin}`");
		for _ in 0..SPAWN_ATTEMPTS {
			match Self::spawn(bin, ephemeral_port(), startup_timeout).await {
				Ok(sim) => return Ok(sim),
				Err(e) => last_err = e,
			}
		}
		Err(last_err)
	}

	/// Spawn a silenced simulator on a fixed port and wait for readiness.
	pub async fn spawn(bin: &str, port: u16, startup_timeout: Duration) -> Result<Self> {
		let child = Command::new(bin)
			.arg("--port")
			.arg(port.to_string())
			.arg("--silent")
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| anyhow!("failed to launch simulator `{bin}`: {e}"))?;

		let mut sim = Self {
			child,
			url: format!("http://localhost:{port}/"),
			port,
		};
		sim.wait_ready(startup_timeout).await?;
		Ok(sim)
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	/// Poll the endpoint until it answers a JSON-RPC request.  A child
	/// that dies in the meantime (port taken, bad flags) fails the poll
	/// immediately instead of burning the whole timeout.
	async fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
		let rpc = RpcClient::new(&self.url);
		let deadline = Instant::now() + timeout;

		loop {
			if let Some(status) = self.child.try_wait()? {
				return Err(anyhow!("simulator exited early with {status}"));
			}
			if rpc.is_responsive().await {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(anyhow!(
					"simulator at {} not responsive after {timeout:?}",
					self.url
				));
			}
			tokio::time::sleep(READY_POLL_INTERVAL).await;
		}
	}

	/// Kill and reap the process.  Dropping the guard has the same
	/// effect; this form just reports errors.
	pub async fn shutdown(mut self) -> Result<()> {
		self.child.kill().await?;
		Ok(())
	}
}

/// Run the simulator in the foreground with inherited stdio until it
/// exits or the user interrupts with Ctrl-C.
pub async fn run_foreground(bin: &str, port: u16) -> Result<()> {
	let mut child = Command::new(bin)
		.arg("--port")
		.arg(port.to_string())
		.kill_on_drop(true)
		.spawn()
		.map_err(|e| anyhow!("failed to launch simulator `{bin}`: {e}"))?;

	tokio::select! {
		status = child.wait() => {
			let status = status?;
			if !status.success() {
				return Err(anyhow!("simulator exited with {status}"));
			}
			Ok(())
		}
		_ = tokio::signal::ctrl_c() => {
			child.kill().await?;
			println!("\nSimulator stopped.");
			Ok(())
		}
	}
}

/// A port in the dynamic range, away from the default 8545 so an
/// ephemeral run never collides with a user-managed node.
fn ephemeral_port() -> u16 {
	rand::thread_rng().gen_range(20_000..60_000)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ephemeral_ports_stay_in_range() {
		for _ in 0..100 {
			let port = ephemeral_port();
			assert!((20_000..60_000).contains(&port));
			assert_ne!(port, 8545);
		}
	}

	#[test]
	fn dev_account_key_is_well_formed() {
		crate::keys::PrivateKey::parse(DEV_ACCOUNT_KEY).unwrap();
	}

	#[tokio::test]
	async fn early_exit_fails_before_the_timeout() {
		// `sh` rejects the simulator flags and exits immediately; the
		// poll must notice instead of waiting out the full timeout.
		let timeout = Duration::from_secs(30);
		let start = std::time::Instant::now();

		let err = Simulator::spawn("sh", ephemeral_port(), timeout)
			.await
			.unwrap_err();

		assert!(err.to_string().contains("exited early"), "got: {err}");
		assert!(start.elapsed() < Duration::from_secs(10));
	}

	#[tokio::test]
	async fn spawn_failure_names_the_binary() {
		let err = Simulator::spawn_ephemeral("soldeploy-no-such-binary", Duration::from_secs(1))
			.await
			.unwrap_err();
		assert!(err.to_string().contains("soldeploy-no-such-binary"));
	}
}
