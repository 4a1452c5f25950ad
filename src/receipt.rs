use std::fmt::Write as _;

use anyhow::{anyhow, Result};
use serde_json::Value;
use thiserror::Error;

use crate::rpc::{parse_quantity, RpcClient};

#[derive(Debug, Error, PartialEq)]
pub enum ReceiptError {
	#[error("tool output did not contain a {0}")]
	MissingField(&'static str),
}

/// What one deployment produced, in the simulator's console receipt
/// field order: Transaction, Contract created, Gas used, Block Number,
/// Block Hash, Block Time.
///
/// The tool prints the transaction hash and address; the remaining
/// fields are confirmed over RPC and stay empty if the endpoint has
/// already gone away.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployReceipt {
	pub transaction: String,
	pub contract_created: Option<String>,
	pub gas_used: Option<u64>,
	pub block_number: Option<u64>,
	pub block_hash: Option<String>,
	pub block_time: Option<String>,
}

impl DeployReceipt {
	/// Scan tool stdout for receipt fields.  Accepts both the deployer's
	/// labels (`Deployed to:`, `Transaction hash:`) and the simulator's
	/// console spellings (`Contract created:`, `Transaction:`).
	pub fn from_tool_output(stdout: &str) -> Result<Self, ReceiptError> {
		let mut transaction = None;
		let mut contract = None;
		let mut gas_used = None;
		let mut block_number = None;
		let mut block_hash = None;
		let mut block_time = None;

		for raw in stdout.lines() {
			let line = raw.trim();
			if let Some(v) = labeled(line, "Transaction hash:").or_else(|| labeled(line, "Transaction:")) {
				transaction = Some(v);
			} else if let Some(v) = labeled(line, "Deployed to:").or_else(|| labeled(line, "Contract created:")) {
				contract = Some(v);
			} else if let Some(v) = labeled(line, "Gas used:") {
				gas_used = v.parse().ok();
			} else if let Some(v) = labeled(line, "Block Number:") {
				block_number = v.parse().ok();
			} else if let Some(v) = labeled(line, "Block Hash:") {
				block_hash = Some(v);
			} else if let Some(v) = labeled(line, "Block Time:") {
				block_time = Some(v);
			}
		}

		Ok(Self {
			transaction: transaction.ok_or(ReceiptError::MissingField("transaction hash"))?,
			contract_created: Some(
				contract.ok_or(ReceiptError::MissingField("contract address"))?,
			),
			gas_used,
			block_number,
			block_hash,
			block_time,
		})
	}

	/// Build a receipt from an `eth_getTransactionReceipt` result.
	pub fn from_rpc_receipt(tx_hash: &str, raw: &Value) -> Self {
		Self {
			transaction: tx_hash.to_owned(),
			contract_created: raw
				.get("contractAddress")
				.and_then(Value::as_str)
				.map(str::to_owned),
			gas_used: raw
				.get("gasUsed")
				.and_then(Value::as_str)
				.and_then(|q| parse_quantity(q).ok()),
			block_number: raw
				.get("blockNumber")
				.and_then(Value::as_str)
				.and_then(|q| parse_quantity(q).ok()),
			block_hash: raw
				.get("blockHash")
				.and_then(Value::as_str)
				.map(str::to_owned),
			block_time: None,
		}
	}

	/// Render in the console receipt format.
	pub fn render(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "Transaction: {}", self.transaction);
		if let Some(addr) = &self.contract_created {
			let _ = writeln!(out, "Contract created: {addr}");
		}
		if let Some(gas) = self.gas_used {
			let _ = writeln!(out, "Gas used: {gas}");
		}
		if self.block_number.is_some() || self.block_hash.is_some() || self.block_time.is_some() {
			let _ = writeln!(out);
		}
		if let Some(n) = self.block_number {
			let _ = writeln!(out, "Block Number: {n}");
		}
		if let Some(h) = &self.block_hash {
			let _ = writeln!(out, "Block Hash: {h}");
		}
		if let Some(t) = &self.block_time {
			let _ = writeln!(out, "Block Time: \"{t}\"");
		}
		out
	}
}

/// Fill the gas/block fields from the chain.  The tool already printed
/// the essentials; this confirmation can fail independently, e.g. when
/// the target endpoint has shut down since the deployment.
pub async fn complete(rpc: &RpcClient, receipt: &mut DeployReceipt) -> Result<()> {
	let raw = rpc
		.get_transaction_receipt(&receipt.transaction)
		.await?
		.ok_or_else(|| anyhow!("no on-chain receipt for {}", receipt.transaction))?;

	let confirmed = DeployReceipt::from_rpc_receipt(&receipt.transaction, &raw);
	receipt.gas_used = confirmed.gas_used.or(receipt.gas_used);
	receipt.block_number = confirmed.block_number.or(receipt.block_number);
	receipt.block_hash = confirmed.block_hash.or(receipt.block_hash.take());

	if let Some(number) = receipt.block_number {
		if let Some(block) = rpc.get_block_by_number(number).await? {
			if let Some(ts) = block.get("timestamp").and_then(Value::as_str) {
				receipt.block_time = Some(format_block_time(parse_quantity(ts)?));
			}
		}
	}

	Ok(())
}

/// Render a unix timestamp the way the simulator console does,
/// e.g. `Wed, 10 Apr 2024 10:57:30 +0000`.
pub fn format_block_time(secs: u64) -> String {
	chrono::DateTime::<chrono::Utc>::from_timestamp(secs as i64, 0)
		.map(|t| t.format("%a, %d %b %Y %H:%M:%S %z").to_string())
		.unwrap_or_else(|| secs.to_string())
}

fn labeled(line: &str, prefix: &str) -> Option<String> {
	line.strip_prefix(prefix)
		.map(|rest| rest.trim().trim_matches('"').to_owned())
}
