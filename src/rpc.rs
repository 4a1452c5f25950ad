use anyhow::{anyhow, Result};
use serde_json::{json, Value};

/// Thin JSON-RPC client for the chain endpoint.
///
/// Only the handful of calls the deployment flows need: readiness
/// probing, receipt lookup, and block metadata for receipt rendering.
/// Everything heavier goes through the external tool.
pub struct RpcClient {
	url: String,
	http: reqwest::Client,
}

impl RpcClient {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_owned(),
			http: reqwest::Client::new(),
		}
	}

	async fn call(&self, method: &str, params: Value) -> Result<Value> {
		let body = json!({
			"id": 1,
			"jsonrpc": "2.0",
			"method": method,
			"params": params,
		});

		let resp: Value = self.http.post(&self.url).json(&body).send().await?.json().await?;

		if let Some(err) = resp.get("error") {
			if !err.is_null() {
				return Err(anyhow!("{method} RPC error: {err}"));
			}
		}

		resp.get("result")
			.cloned()
			.ok_or_else(|| anyhow!("{method}: malformed JSON-RPC response"))
	}

	/// True once the endpoint answers any well-formed JSON-RPC request.
	pub async fn is_responsive(&self) -> bool {
		self.call("eth_blockNumber", json!([])).await.is_ok()
	}

	pub async fn block_number(&self) -> Result<u64> {
		let result = self.call("eth_blockNumber", json!([])).await?;
		quantity_from(&result, "eth_blockNumber")
	}

	pub async fn chain_id(&self) -> Result<u64> {
		let result = self.call("eth_chainId", json!([])).await?;
		quantity_from(&result, "eth_chainId")
	}

	/// Fetch the receipt for a mined transaction.  `None` means the node
	/// does not know the hash (not mined, or never submitted).
	pub async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<Value>> {
		let result = self
			.call("eth_getTransactionReceipt", json!([tx_hash]))
			.await?;
		Ok(non_null(result))
	}

	/// Fetch block metadata by number, without transaction bodies.
	pub async fn get_block_by_number(&self, number: u64) -> Result<Option<Value>> {
		let result = self
			.call("eth_getBlockByNumber", json!([format!("0x{number:x}"), false]))
			.await?;
		Ok(non_null(result))
	}
}

/// Parse a 0x-prefixed hex quantity into a u64.
pub fn parse_quantity(hex_str: &str) -> Result<u64> {
	let clean = hex_str.strip_prefix("0x").unwrap_or(hex_str);
	u64::from_str_radix(clean, 16).map_err(|e| anyhow!("invalid hex quantity {hex_str:?}: {e}"))
}

fn quantity_from(result: &Value, method: &str) -> Result<u64> {
	let s = result
		.as_str()
		.ok_or_else(|| anyhow!("{method}: expected a hex quantity, got {result}"))?;
	parse_quantity(s)
}

fn non_null(value: Value) -> Option<Value> {
	if value.is_null() {
		None
	} else {
		Some(value)
	}
}
