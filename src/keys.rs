use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum KeyError {
	#[error("private key must be 64 hex characters, got {0}")]
	BadLength(usize),
	#[error("private key is not valid hex: {0}")]
	BadHex(#[from] hex::FromHexError),
	#[error("private key must not be all zeroes")]
	Zero,
}

/// A hex-encoded signing key held in memory for the duration of one
/// deployment.  Never serialized, never written to disk; Debug output
/// is redacted so the value cannot leak through error chains or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
	/// Parse a 32-byte key from hex, with or without a 0x prefix.
	pub fn parse(s: &str) -> Result<Self, KeyError> {
		let clean = s.trim();
		let clean = clean.strip_prefix("0x").unwrap_or(clean);
		if clean.len() != 64 {
			return Err(KeyError::BadLength(clean.len()));
		}
		let bytes = hex::decode(clean)?;
		let mut buf = [0u8; 32];
		buf.copy_from_slice(&bytes);
		if buf.iter().all(|b| *b == 0) {
			return Err(KeyError::Zero);
		}
		Ok(Self(buf))
	}

	/// The 0x-prefixed hex form handed to the external tool.  Callers
	/// must pass this to a subprocess argument only, never print it.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PrivateKey(<redacted>)")
	}
}

/// Prompt on stderr and read a key from one line of stdin.
pub fn prompt_key() -> anyhow::Result<PrivateKey> {
	eprint!("Enter private key: ");
	io::stderr().flush()?;

	let mut line = String::new();
	io::stdin().lock().read_line(&mut line)?;
	Ok(PrivateKey::parse(&line)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn parses_with_and_without_prefix() {
		let bare = PrivateKey::parse(DEV_KEY).unwrap();
		let prefixed = PrivateKey::parse(&format!("0x{DEV_KEY}")).unwrap();
		assert_eq!(bare, prefixed);
	}

	#[test]
	fn hex_form_is_prefixed() {
		let key = PrivateKey::parse(DEV_KEY).unwrap();
		assert_eq!(key.to_hex(), format!("0x{DEV_KEY}"));
	}

	#[test]
	fn trims_surrounding_whitespace() {
		// Interactive entry includes the trailing newline.
		let key = PrivateKey::parse(&format!("  0x{DEV_KEY}\n")).unwrap();
		assert_eq!(key.to_hex(), format!("0x{DEV_KEY}"));
	}

	#[test]
	fn rejects_wrong_length() {
		assert_eq!(
			PrivateKey::parse("0xabcd"),
			Err(KeyError::BadLength(4))
		);
	}

	#[test]
	fn rejects_non_hex() {
		let garbage = "zz".repeat(32);
		assert!(matches!(
			PrivateKey::parse(&garbage),
			Err(KeyError::BadHex(_))
		));
	}

	#[test]
	fn rejects_zero_key() {
		let zeroes = "00".repeat(32);
		assert_eq!(PrivateKey::parse(&zeroes), Err(KeyError::Zero));
	}

	#[test]
	fn debug_output_is_redacted() {
		let key = PrivateKey::parse(DEV_KEY).unwrap();
		let debug = format!("{key:?}");
		assert_eq!(debug, "PrivateKey(<redacted>)");
		assert!(!debug.contains("ac0974"));
	}
}
