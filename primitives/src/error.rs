use std::{path::PathBuf, time::Duration};

use web3::types::H256;

/// Failures of one attestation run. Component crates convert their own errors into these.
#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Read file Error, path: {}, err: {source}", .path.display())]
	IoError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Connection Error, endpoint: {endpoint}, err: {reason}")]
	ConnectivityError { endpoint: String, reason: String },

	#[error("Authorization Error, err: {0}")]
	AuthorizationError(String),

	#[error("Transaction Reverted, tx: {0:?}")]
	RevertError(H256),

	#[error("Timeout Error, no receipt for tx {tx:?} after {}s", .elapsed.as_secs())]
	TimeoutError { tx: H256, elapsed: Duration },

	#[error("Contract Abi Error, err: {0}")]
	AbiError(String),

	#[error("Transaction Rejected, err: {0}")]
	RejectedError(String),

	#[error("Config Error, err: {0}")]
	ConfigError(String),
}

impl Error {
	pub fn connectivity(endpoint: impl Into<String>, reason: impl ToString) -> Self {
		Error::ConnectivityError { endpoint: endpoint.into(), reason: reason.to_string() }
	}
}

pub type Result<T> = std::result::Result<T, Error>;
