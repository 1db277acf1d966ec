use std::{path::PathBuf, time::Duration};

use attest_primitives::STORE_HASH_METHOD;
use serde::{Deserialize, Serialize};
use web3::{api::Eth, contract::Contract, ethabi, transports::Http, types::{Address, U256, U64}, Web3};

use super::{
	error::{Error, Result},
	utils,
};

pub const ETHEREUM_TRANSACTION_CONFIRMATIONS: usize = 1;
pub const RECEIPT_POLL_INTERVAL_SECS: u64 = 1;
pub const RECEIPT_TIMEOUT_SECS: u64 = 120;

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct EthereumConfig {
	// json-rpc endpoint, e.g. http://127.0.0.1:8545
	pub url: String,
	pub contract_address: String,
	// abi json of the contract, the bundled PhotoRegistry abi when absent
	#[serde(default)]
	pub contract_abi: Option<PathBuf>,
	#[serde(default = "default_method")]
	pub method: String,
	#[serde(default = "default_confirmations")]
	pub confirmations: usize,
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
	#[serde(default = "default_receipt_timeout_secs")]
	pub receipt_timeout_secs: u64,
	// estimated by the node when absent
	#[serde(default)]
	pub gas: Option<u64>,
	#[serde(default)]
	pub chain_id: Option<u64>,
}

fn default_method() -> String {
	STORE_HASH_METHOD.to_owned()
}

fn default_confirmations() -> usize {
	ETHEREUM_TRANSACTION_CONFIRMATIONS
}

fn default_poll_interval_secs() -> u64 {
	RECEIPT_POLL_INTERVAL_SECS
}

fn default_receipt_timeout_secs() -> u64 {
	RECEIPT_TIMEOUT_SECS
}

impl EthereumConfig {
	pub fn template() -> Self {
		Self {
			url: "http://127.0.0.1:8545".to_string(),
			contract_address: "0x0000000000000000000000000000000000000000".to_string(),
			contract_abi: None,
			method: default_method(),
			confirmations: default_confirmations(),
			poll_interval_secs: default_poll_interval_secs(),
			receipt_timeout_secs: default_receipt_timeout_secs(),
			gas: None,
			chain_id: None,
		}
	}
}

/// How a transaction is sent and awaited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
	pub gas: Option<U256>,
	pub chain_id: Option<u64>,
	pub confirmations: usize,
	pub poll_interval: Duration,
	pub receipt_timeout: Duration,
}

impl Default for SubmitOptions {
	fn default() -> Self {
		Self::from(&EthereumConfig::template())
	}
}

impl From<&EthereumConfig> for SubmitOptions {
	fn from(config: &EthereumConfig) -> Self {
		SubmitOptions {
			gas: config.gas.map(Into::into),
			chain_id: config.chain_id,
			confirmations: config.confirmations,
			poll_interval: Duration::from_secs(config.poll_interval_secs),
			receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
		}
	}
}

#[derive(Clone, Debug)]
pub struct EthClient {
	inner: Web3<Http>,
	url: String,
}

impl EthClient {
	pub fn new(url: &str) -> Result<Self> {
		if url.starts_with("http") {
			let web3 = Web3::new(Http::new(url)?);
			Ok(EthClient { inner: web3, url: url.to_owned() })
		} else {
			Err(Error::ClientCreationError("Wrong Ethereum connection url".to_owned()))
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn web3(&self) -> &Web3<Http> {
		&self.inner
	}

	pub fn eth(&self) -> Eth<Http> {
		self.inner.eth()
	}

	pub async fn best_number(&self) -> Result<U64> {
		let maybe_best = self.eth().block_number().await;
		maybe_best.map_err(|e| e.into())
	}

	/// Bind the deployed contract at `contract_addr` described by `abi`.
	pub fn contract_handle(&self, contract_addr: &str, abi: &[u8]) -> Result<ContractHandle> {
		let address = utils::trim_address_str(contract_addr)?;
		let contract = Contract::from_json(self.eth(), address, abi)?;
		Ok(ContractHandle { endpoint: self.url.clone(), contract })
	}
}

/// A deployed contract reachable through one node.
#[derive(Clone, Debug)]
pub struct ContractHandle {
	endpoint: String,
	contract: Contract<Http>,
}

impl ContractHandle {
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn address(&self) -> Address {
		self.contract.address()
	}

	pub fn abi(&self) -> &ethabi::Contract {
		self.contract.abi()
	}
}
