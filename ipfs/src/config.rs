use attest_primitives::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct IpfsConfig {
	// e.g. /ip4/127.0.0.1/tcp/5001/http
	pub api_multiaddr: String,
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
	#[serde(default = "default_connect_timeout_secs")]
	pub connect_timeout_secs: u64,
	#[serde(default = "default_pin")]
	pub pin: bool,
	#[serde(default)]
	pub cid_version: u8,
	// basic auth for hosted api gateways
	#[serde(default)]
	pub auth: Option<IpfsAuth>,
}

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct IpfsAuth {
	pub username: String,
	pub password: Option<String>,
}

fn default_timeout_secs() -> u64 {
	60
}

fn default_connect_timeout_secs() -> u64 {
	5
}

fn default_pin() -> bool {
	true
}

impl IpfsConfig {
	pub fn template() -> Self {
		Self {
			api_multiaddr: "/ip4/127.0.0.1/tcp/5001/http".to_string(),
			timeout_secs: default_timeout_secs(),
			connect_timeout_secs: default_connect_timeout_secs(),
			pin: default_pin(),
			cid_version: 0,
			auth: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_should_use_defaults() {
		let config: IpfsConfig =
			serde_json::from_str(r#"{ "api_multiaddr": "/dns/ipfs.example.org/tcp/5001/https" }"#)
				.unwrap();
		assert_eq!(
			config,
			IpfsConfig {
				api_multiaddr: "/dns/ipfs.example.org/tcp/5001/https".to_string(),
				..IpfsConfig::template()
			}
		);
	}
}
