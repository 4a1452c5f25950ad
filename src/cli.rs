use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "soldeploy",
	about = "Deploy contracts to a local single-node devnet through an external toolchain.",
	version
)]
pub struct Cli {
	/// Target RPC endpoint URL.
	#[arg(long, global = true)]
	pub rpc_url: Option<String>,

	/// Override the contract tool binary.
	#[arg(long, global = true)]
	pub tool_bin: Option<String>,

	/// Override the local simulator binary.
	#[arg(long, global = true)]
	pub simulator_bin: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Compile a contract and deploy it in one step.
	Create {
		/// Contract identifier (e.g. src/Counter.sol:Counter).
		contract: String,

		/// Hex-encoded signing key.
		#[arg(long, conflicts_with = "interactive")]
		private_key: Option<String>,

		/// Prompt for the signing key instead of passing it on the command line.
		#[arg(long)]
		interactive: bool,

		/// Constructor arguments, passed through to the tool verbatim.
		#[arg(long, num_args = 1..)]
		constructor_args: Vec<String>,
	},

	/// Run a deployment script through the tool's script runner.
	Script {
		/// Path to the deployment script (*.s.sol).
		path: PathBuf,

		/// Submit broadcast-region calls as real transactions.
		#[arg(long)]
		broadcast: bool,

		/// Hex-encoded signing key (required with --broadcast).
		#[arg(long, conflicts_with = "interactive")]
		private_key: Option<String>,

		/// Prompt for the signing key instead of passing it on the command line.
		#[arg(long)]
		interactive: bool,
	},

	/// Run a local chain simulator in the foreground.
	Node {
		/// Port for the simulator's RPC endpoint.
		#[arg(long, default_value = "8545")]
		port: u16,
	},

	/// Lint a deployment script without running it.
	Check {
		/// Path to the deployment script (*.s.sol).
		path: PathBuf,
	},

	/// Show the on-chain receipt of a transaction.
	Tx {
		/// Transaction hash (0x-prefixed).
		tx_hash: String,
	},

	/// Show or edit persistent CLI settings.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

// -- Config subcommands --

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Print the active configuration.
	Show,

	/// Change settings and persist them to disk.
	Set {
		/// Default RPC endpoint URL.
		#[arg(long)]
		rpc_url: Option<String>,

		/// Contract tool binary.
		#[arg(long)]
		tool_bin: Option<String>,

		/// Local simulator binary.
		#[arg(long)]
		simulator_bin: Option<String>,
	},
}
