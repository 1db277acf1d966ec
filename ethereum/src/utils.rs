use std::path::Path;

use serde_json::Value;
use web3::types::Address;

use super::error::{Error, Result};

const BUNDLED_ABI: &[u8] = include_bytes!("../contracts/PhotoRegistry.json");

pub fn trim_address_str(addr: &str) -> Result<Address> {
	let addr = addr.strip_prefix("0x").unwrap_or(addr);
	let hex_res =
		hex::decode(addr).map_err(|e| Error::InvalidEthereumAddress(format!("{:}", e)))?;
	// check length
	if hex_res.len() != 20 {
		return Err(Error::InvalidEthereumAddress(format!(
			"Address is not equal to 20 bytes: {:}",
			addr
		)))
	}
	Ok(Address::from_slice(&hex_res))
}

/// Raw abi json of the contract. Without a path the bundled `PhotoRegistry` abi is used.
///
/// Both a bare abi array and a build artifact carrying an `abi` field are accepted.
pub fn load_abi(path: Option<&Path>) -> Result<Vec<u8>> {
	let path = match path {
		Some(p) => p,
		None => return Ok(BUNDLED_ABI.to_vec()),
	};
	let raw = std::fs::read(path)?;
	match serde_json::from_slice::<Value>(&raw)? {
		Value::Array(_) => Ok(raw),
		Value::Object(mut artifact) => match artifact.remove("abi") {
			Some(abi @ Value::Array(_)) => Ok(serde_json::to_vec(&abi)?),
			_ => Err(Error::InvalidAbi(format!("{} has no abi array", path.display()))),
		},
		_ => Err(Error::InvalidAbi(format!("{} is not an abi", path.display()))),
	}
}
