use std::fmt;

use serde::{Deserialize, Serialize};
use web3::{
	ethabi::Token,
	types::{Address, TransactionReceipt, H256, U256, U64},
};

pub type TxHash = H256;

/// Content identifier returned by the IPFS node. Opaque, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
	pub fn new(hash: impl Into<String>) -> Option<Self> {
		let hash = hash.into();
		if hash.trim().is_empty() {
			None
		} else {
			Some(ContentHash(hash))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<ContentHash> for Token {
	fn from(hash: ContentHash) -> Self {
		Token::String(hash.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
	Success,
	Reverted,
	// pre-byzantium nodes do not report a status
	Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
	pub transaction_hash: H256,
	pub block_hash: Option<H256>,
	pub block_number: Option<U64>,
	pub from: Address,
	pub to: Option<Address>,
	pub gas_used: Option<U256>,
	pub status: ReceiptStatus,
}

impl Receipt {
	pub fn is_reverted(&self) -> bool {
		self.status == ReceiptStatus::Reverted
	}
}

impl From<TransactionReceipt> for Receipt {
	fn from(r: TransactionReceipt) -> Self {
		let status = match r.status {
			Some(s) if s == U64::one() => ReceiptStatus::Success,
			Some(_) => ReceiptStatus::Reverted,
			None => ReceiptStatus::Unknown,
		};
		Receipt {
			transaction_hash: r.transaction_hash,
			block_hash: r.block_hash,
			block_number: r.block_number,
			from: r.from,
			to: r.to,
			gas_used: r.gas_used,
			status,
		}
	}
}
