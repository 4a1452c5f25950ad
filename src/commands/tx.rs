use anyhow::Result;
use serde_json::Value;

use crate::cli::Cli;
use crate::commands::resolve_rpc;
use crate::config::Config;
use crate::receipt::{self, DeployReceipt};
use crate::rpc::{parse_quantity, RpcClient};

pub async fn run(cli: &Cli, tx_hash: &str) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config);
	let rpc = RpcClient::new(&rpc_url);

	match rpc.get_transaction_receipt(tx_hash).await? {
		Some(raw) => {
			let mut receipt = DeployReceipt::from_rpc_receipt(tx_hash, &raw);
			if let Some(number) = receipt.block_number {
				if let Some(block) = rpc.get_block_by_number(number).await? {
					if let Some(ts) = block.get("timestamp").and_then(Value::as_str) {
						receipt.block_time =
							Some(receipt::format_block_time(parse_quantity(ts)?));
					}
				}
			}
			print!("{}", receipt.render());
			Ok(())
		}
		None => {
			println!("Transaction not found: {tx_hash}");
			Ok(())
		}
	}
}
