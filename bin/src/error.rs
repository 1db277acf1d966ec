#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Config load Error, err: {0}")]
	ConfigLoadError(#[from] super::config::Error),

	#[error("IPFS client Error, err: {0}")]
	IpfsError(#[from] attest_ipfs::Error),

	#[error("Ethereum client Error, err: {0}")]
	EthereumError(#[from] attest_ethereum::Error),

	#[error(transparent)]
	AttestError(#[from] attestor::AttestError),

	#[error("Receipt print Error, err: {0}")]
	JsonError(#[from] serde_json::Error),

	#[error("Signal handler Error, err: {0}")]
	IoError(#[from] std::io::Error),

	#[error("Interrupted, a submitted transaction may still be included")]
	Interrupted,
}
