use std::time::Duration;

use attest_primitives::Error as AttestError;
use web3::types::{Address, H256};

// rpc error messages geth and openethereum use for accounts they cannot sign with
const AUTHORIZATION_HINTS: [&str; 5] =
	["authentication needed", "unlock", "locked", "unknown account", "password"];

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Ethereum connection Error: {0}")]
	ClientCreationError(String),

	#[error("Private Key Error, Error: {0}")]
	PrivateKeyError(#[from] secp256k1::Error),

	#[error("Keystore Error, Error: {0}")]
	KeystoreError(#[from] eth_keystore::KeystoreError),

	#[error("Web3 Client Error, err: {0}")]
	Web3Error(#[from] web3::Error),

	#[error("Ethereum Abi Error, err: {0}")]
	EthAbiError(#[from] web3::ethabi::Error),

	#[error("Invalid Ethereum Address: {0}")]
	InvalidEthereumAddress(String),

	#[error("Invalid Contract Abi: {0}")]
	InvalidAbi(String),

	#[error("Method {0} is not in the contract abi")]
	UnknownMethod(String),

	#[error("Method {method} takes {expected} arguments, got {got}")]
	ArgumentMismatch { method: String, expected: usize, got: usize },

	#[error("Account {0:?} could not be unlocked")]
	UnlockRejected(Address),

	#[error("Signer Error, err: {0}")]
	Unauthorized(String),

	#[error("Transaction {0:?} reverted")]
	Reverted(H256),

	#[error("Timeout error, tx: {tx:?}, waited: {elapsed:?}")]
	TimeOutError { tx: H256, elapsed: Duration },

	#[error(transparent)]
	JsonError(#[from] serde_json::Error),

	#[error(transparent)]
	IoError(#[from] std::io::Error),
}

impl Error {
	pub fn into_attest_error(self, endpoint: &str) -> AttestError {
		match self {
			Error::Web3Error(e) => classify_web3_error(e, endpoint),
			Error::Reverted(tx) => AttestError::RevertError(tx),
			Error::TimeOutError { tx, elapsed } => AttestError::TimeoutError { tx, elapsed },
			Error::KeystoreError(_) | Error::UnlockRejected(_) | Error::Unauthorized(_) =>
				AttestError::AuthorizationError(self.to_string()),
			Error::EthAbiError(_) |
			Error::InvalidAbi(_) |
			Error::UnknownMethod(_) |
			Error::ArgumentMismatch { .. } => AttestError::AbiError(self.to_string()),
			Error::ClientCreationError(_) |
			Error::PrivateKeyError(_) |
			Error::InvalidEthereumAddress(_) |
			Error::JsonError(_) |
			Error::IoError(_) => AttestError::ConfigError(self.to_string()),
		}
	}
}

fn classify_web3_error(e: web3::Error, endpoint: &str) -> AttestError {
	match e {
		web3::Error::Unreachable |
		web3::Error::Transport(_) |
		web3::Error::Io(_) |
		web3::Error::Decoder(_) |
		web3::Error::InvalidResponse(_) => AttestError::connectivity(endpoint, e),
		web3::Error::Rpc(ref rpc) if is_authorization_message(&rpc.message) =>
			AttestError::AuthorizationError(e.to_string()),
		other => AttestError::RejectedError(other.to_string()),
	}
}

pub(crate) fn is_authorization_message(message: &str) -> bool {
	let message = message.to_lowercase();
	AUTHORIZATION_HINTS.iter().any(|hint| message.contains(hint))
}

pub type Result<T> = std::result::Result<T, Error>;
