use anyhow::Result;

use crate::cli::Cli;
use crate::commands::{resolve_key, resolve_rpc, resolve_tool_bin};
use crate::config::Config;
use crate::keys::PrivateKey;
use crate::receipt::{self, DeployReceipt};
use crate::rpc::RpcClient;
use crate::toolchain::{self, ProcessRunner, ToolRunner};

pub async fn run(
	cli: &Cli,
	contract: &str,
	private_key: Option<&str>,
	interactive: bool,
	constructor_args: &[String],
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config);
	let tool_bin = resolve_tool_bin(cli, &config);
	let key = resolve_key(private_key, interactive)?;

	deploy(
		&ProcessRunner,
		&tool_bin,
		contract,
		&rpc_url,
		&key,
		constructor_args,
	)
	.await
}

/// Invoke the tool once and report the receipt.  A new contract
/// instance and address result from every successful call; there is no
/// redeploy-as-update.
async fn deploy(
	runner: &dyn ToolRunner,
	tool_bin: &str,
	contract: &str,
	rpc_url: &str,
	key: &PrivateKey,
	constructor_args: &[String],
) -> Result<()> {
	println!("Deploying {contract} to {rpc_url}...");

	let args = toolchain::create_args(contract, rpc_url, key, constructor_args);
	let output = runner.run(tool_bin, &args).await?;

	let mut receipt = DeployReceipt::from_tool_output(&output.stdout)?;

	// The deployment already succeeded; confirmation only fills in the
	// gas/block fields and may fail on its own.
	let rpc = RpcClient::new(rpc_url);
	if let Err(e) = receipt::complete(&rpc, &mut receipt).await {
		eprintln!("warning: could not confirm receipt over RPC: {e}");
	}

	print!("{}", receipt.render());
	Ok(())
}
