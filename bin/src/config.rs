use std::{fs::File, path::Path};

use attest_ethereum::{EthereumConfig, SignerConfig};
use attest_ipfs::IpfsConfig;
use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct Config {
	pub ethereum: EthereumConfig,
	pub signer: SignerConfig,
	pub ipfs: IpfsConfig,
}

impl Config {
	pub fn load_from_json(config_path: &Path) -> Result<Self> {
		let file = File::open(config_path)?;
		let res = serde_json::from_reader(file)?;
		Ok(res)
	}

	pub fn template() -> Self {
		Self {
			ethereum: EthereumConfig::template(),
			signer: SignerConfig::template(),
			ipfs: IpfsConfig::template(),
		}
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Open Config File Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Json Parse to Config Error: {0}")]
	JsonParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
