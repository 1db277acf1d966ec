use std::{fmt, path::{Path, PathBuf}, str::FromStr};

use async_trait::async_trait;
use secp256k1::SecretKey;
use serde::{Deserialize, Serialize};
use web3::{
	signing::{Key, SecretKeyRef},
	transports::Http,
	types::{Address, Bytes, CallRequest, TransactionParameters, TransactionRequest, H256, U256},
	Web3,
};

use attest_primitives::ETHEREUM_SUBMIT_LOG_TARGET;

use super::{
	error::{Error, Result},
	utils,
};

/// Where the signing account's credential comes from.
#[derive(Eq, PartialEq, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignerConfig {
	PrivateKey {
		private_key: String,
	},
	// encrypted json keystore, as written by geth or clef
	Keystore {
		path: PathBuf,
		password: String,
	},
	// account managed by the node itself, unlocked over `personal_unlockAccount`
	NodeAccount {
		address: String,
		#[serde(default)]
		password: Option<String>,
		#[serde(default)]
		unlock_duration_secs: Option<u16>,
	},
}

impl fmt::Debug for SignerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SignerConfig::PrivateKey { .. } => f.write_str("PrivateKey"),
			SignerConfig::Keystore { path, .. } =>
				f.debug_struct("Keystore").field("path", path).finish_non_exhaustive(),
			SignerConfig::NodeAccount { address, unlock_duration_secs, .. } => f
				.debug_struct("NodeAccount")
				.field("address", address)
				.field("unlock_duration_secs", unlock_duration_secs)
				.finish_non_exhaustive(),
		}
	}
}

impl SignerConfig {
	pub fn template() -> Self {
		SignerConfig::PrivateKey { private_key: "0x...".to_string() }
	}

	pub fn build(&self) -> Result<Box<dyn TransactionSigner>> {
		let signer: Box<dyn TransactionSigner> = match self {
			SignerConfig::PrivateKey { private_key } => Box::new(LocalSigner::from_hex(private_key)?),
			SignerConfig::Keystore { path, password } =>
				Box::new(LocalSigner::from_keystore(path, password)?),
			SignerConfig::NodeAccount { address, password, unlock_duration_secs } =>
				Box::new(NodeAccountSigner::new(
					utils::trim_address_str(address)?,
					password.clone(),
					*unlock_duration_secs,
				)),
		};
		log::info!(target: ETHEREUM_SUBMIT_LOG_TARGET, "signing account: {:?}", signer.address());
		Ok(signer)
	}
}

/// A contract call ready to be authorized and sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractCall {
	pub to: Address,
	pub data: Bytes,
	pub gas: Option<U256>,
	pub chain_id: Option<u64>,
}

/// Something that can authorize a transaction on behalf of one account.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
	fn address(&self) -> Address;

	/// Authorize `call` and hand it to the node, returning the transaction hash.
	async fn send(&self, web3: &Web3<Http>, call: ContractCall) -> Result<H256>;
}

/// Signs with a key held by this process and sends raw transactions.
pub struct LocalSigner {
	key: SecretKey,
	address: Address,
}

impl fmt::Debug for LocalSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocalSigner").field("address", &self.address).finish_non_exhaustive()
	}
}

impl LocalSigner {
	pub fn new(key: SecretKey) -> Self {
		let address = SecretKeyRef::new(&key).address();
		LocalSigner { key, address }
	}

	pub fn from_hex(private_key: &str) -> Result<Self> {
		let private_key = private_key.strip_prefix("0x").unwrap_or(private_key);
		Ok(Self::new(SecretKey::from_str(private_key)?))
	}

	pub fn from_keystore(path: &Path, password: &str) -> Result<Self> {
		let secret = eth_keystore::decrypt_key(path, password)?;
		Ok(Self::new(SecretKey::from_slice(&secret)?))
	}
}

#[async_trait]
impl TransactionSigner for LocalSigner {
	fn address(&self) -> Address {
		self.address
	}

	async fn send(&self, web3: &Web3<Http>, call: ContractCall) -> Result<H256> {
		let gas = match call.gas {
			Some(gas) => gas,
			None => {
				let request = CallRequest {
					from: Some(self.address),
					to: Some(call.to),
					data: Some(call.data.clone()),
					..Default::default()
				};
				web3.eth().estimate_gas(request, None).await?
			},
		};
		let tx = TransactionParameters {
			to: Some(call.to),
			data: call.data,
			gas,
			chain_id: call.chain_id,
			..Default::default()
		};
		// nonce, gas price and chain id left empty are filled in by the node
		let signed = web3.accounts().sign_transaction(tx, &self.key).await?;
		log::debug!(
			target: ETHEREUM_SUBMIT_LOG_TARGET,
			"signed tx {:?} locally with account {:?}",
			signed.transaction_hash,
			self.address
		);
		Ok(web3.eth().send_raw_transaction(signed.raw_transaction).await?)
	}
}

/// Lets the node sign with one of its own accounts.
#[derive(Clone)]
pub struct NodeAccountSigner {
	address: Address,
	password: Option<String>,
	unlock_duration: Option<u16>,
}

impl fmt::Debug for NodeAccountSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeAccountSigner")
			.field("address", &self.address)
			.field("unlock_duration", &self.unlock_duration)
			.finish_non_exhaustive()
	}
}

impl NodeAccountSigner {
	pub fn new(address: Address, password: Option<String>, unlock_duration: Option<u16>) -> Self {
		NodeAccountSigner { address, password, unlock_duration }
	}

	async fn unlock(&self, web3: &Web3<Http>, password: &str) -> Result<()> {
		let unlocked = web3
			.personal()
			.unlock_account(self.address, password, self.unlock_duration)
			.await
			.map_err(|e| match e {
				web3::Error::Rpc(rpc) => Error::Unauthorized(format!(
					"unlock {:?} rejected by node: {}",
					self.address, rpc.message
				)),
				other => other.into(),
			})?;
		if !unlocked {
			return Err(Error::UnlockRejected(self.address))
		}
		log::debug!(target: ETHEREUM_SUBMIT_LOG_TARGET, "account {:?} unlocked", self.address);
		Ok(())
	}
}

#[async_trait]
impl TransactionSigner for NodeAccountSigner {
	fn address(&self) -> Address {
		self.address
	}

	async fn send(&self, web3: &Web3<Http>, call: ContractCall) -> Result<H256> {
		if let Some(password) = &self.password {
			self.unlock(web3, password).await?;
		}
		let request = TransactionRequest {
			from: self.address,
			to: Some(call.to),
			gas: call.gas,
			data: Some(call.data),
			..Default::default()
		};
		Ok(web3.eth().send_transaction(request).await?)
	}
}

#[cfg(test)]
mod tests {
	use attest_primitives::Error as AttestError;
	use serde_json::json;

	use super::*;
	use crate::stub::{ok, rpc_error, RpcNode};

	// the example key of the web3.js account docs
	const PRIVATE_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
	const ADDRESS: &str = "2c7536e3605d9c16a7a3d7b1898e529396a65c23";

	fn expected_address() -> Address {
		utils::trim_address_str(ADDRESS).unwrap()
	}

	#[test]
	fn local_signer_should_derive_address() {
		let signer = LocalSigner::from_hex(PRIVATE_KEY).unwrap();
		assert_eq!(signer.address(), expected_address());
		// same key without prefix
		let signer = LocalSigner::from_hex(&PRIVATE_KEY[2..]).unwrap();
		assert_eq!(signer.address(), expected_address());
	}

	#[test]
	fn bad_private_key_should_fail() {
		assert!(matches!(LocalSigner::from_hex("0x1234"), Err(Error::PrivateKeyError(_))));
	}

	#[test]
	fn keystore_signer_should_decrypt_key() {
		let dir = tempfile::tempdir().unwrap();
		let secret = hex::decode(&PRIVATE_KEY[2..]).unwrap();
		eth_keystore::encrypt_key(
			dir.path(),
			&mut rand::thread_rng(),
			&secret,
			"correct horse",
			Some("signer.json"),
		)
		.unwrap();
		let path = dir.path().join("signer.json");

		let signer = LocalSigner::from_keystore(&path, "correct horse").unwrap();
		assert_eq!(signer.address(), expected_address());

		let res = LocalSigner::from_keystore(&path, "battery staple");
		assert!(matches!(res, Err(Error::KeystoreError(_))));
	}

	#[test]
	fn signer_config_should_parse_every_variant() {
		let config: SignerConfig =
			serde_json::from_str(&format!(r#"{{ "type": "private_key", "private_key": "{}" }}"#, PRIVATE_KEY))
				.unwrap();
		assert_eq!(config.build().unwrap().address(), expected_address());

		let config: SignerConfig = serde_json::from_str(&format!(
			r#"{{ "type": "node_account", "address": "0x{}", "password": "secret" }}"#,
			ADDRESS
		))
		.unwrap();
		assert_eq!(
			config,
			SignerConfig::NodeAccount {
				address: format!("0x{}", ADDRESS),
				password: Some("secret".to_owned()),
				unlock_duration_secs: None,
			}
		);
		assert_eq!(config.build().unwrap().address(), expected_address());

		let config: SignerConfig =
			serde_json::from_str(r#"{ "type": "keystore", "path": "./keys/signer.json", "password": "pw" }"#)
				.unwrap();
		assert!(matches!(config, SignerConfig::Keystore { .. }));
	}

	#[test]
	fn signer_debug_should_hide_credentials() {
		let config = SignerConfig::PrivateKey { private_key: PRIVATE_KEY.to_owned() };
		assert!(!format!("{:?}", config).contains(&PRIVATE_KEY[2..]));

		let signer = LocalSigner::from_hex(PRIVATE_KEY).unwrap();
		assert!(!format!("{:?}", signer).contains(&PRIVATE_KEY[2..]));

		let config = SignerConfig::NodeAccount {
			address: ADDRESS.to_owned(),
			password: Some("hunter2".to_owned()),
			unlock_duration_secs: Some(30),
		};
		assert!(!format!("{:?}", config).contains("hunter2"));
	}

	fn web3(node: &RpcNode) -> Web3<Http> {
		Web3::new(Http::new(&node.url).unwrap())
	}

	fn store_call(gas: Option<U256>) -> ContractCall {
		ContractCall {
			to: Address::from_low_u64_be(0xaa),
			data: Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
			gas,
			chain_id: None,
		}
	}

	#[tokio::test]
	async fn local_signer_with_fixed_gas_should_skip_estimate() {
		let sent = H256::repeat_byte(0xef);
		let node = RpcNode::start(vec![
			("eth_getTransactionCount", vec![ok(json!("0x3"))]),
			("eth_gasPrice", vec![ok(json!("0x3b9aca00"))]),
			("eth_chainId", vec![ok(json!("0x539"))]),
			("eth_sendRawTransaction", vec![ok(json!(sent))]),
		])
		.await;
		let signer = LocalSigner::from_hex(PRIVATE_KEY).unwrap();

		let tx = signer.send(&web3(&node), store_call(Some(300_000.into()))).await.unwrap();
		assert_eq!(tx, sent);
		assert!(node.params("eth_estimateGas").is_empty());
		assert_eq!(node.params("eth_getTransactionCount")[0][0], json!(expected_address()));
	}

	#[tokio::test]
	async fn node_account_should_unlock_then_send() {
		let sent = H256::repeat_byte(0xef);
		let node = RpcNode::start(vec![
			("personal_unlockAccount", vec![ok(json!(true))]),
			("eth_sendTransaction", vec![ok(json!(sent))]),
		])
		.await;
		let signer = NodeAccountSigner::new(expected_address(), Some("secret".to_owned()), Some(30));

		let tx = signer.send(&web3(&node), store_call(None)).await.unwrap();
		assert_eq!(tx, sent);
		assert_eq!(node.methods(), vec!["personal_unlockAccount", "eth_sendTransaction"]);
		assert_eq!(node.params("personal_unlockAccount")[0], json!([expected_address(), "secret", 30]));
		let request = &node.params("eth_sendTransaction")[0][0];
		assert_eq!(request["from"], json!(expected_address()));
		assert_eq!(request["data"], json!("0xdeadbeef"));
	}

	#[tokio::test]
	async fn refused_unlock_should_be_authorization_error() {
		let node = RpcNode::start(vec![("personal_unlockAccount", vec![ok(json!(false))])]).await;
		let signer = NodeAccountSigner::new(expected_address(), Some("wrong".to_owned()), None);

		let err = signer.send(&web3(&node), store_call(None)).await.unwrap_err();
		assert!(matches!(err, Error::UnlockRejected(a) if a == expected_address()));
		assert!(matches!(err.into_attest_error(&node.url), AttestError::AuthorizationError(_)));
		// nothing is sent with a locked account
		assert!(node.params("eth_sendTransaction").is_empty());
	}

	#[tokio::test]
	async fn unlock_rpc_failure_should_be_authorization_error() {
		let node = RpcNode::start(vec![(
			"personal_unlockAccount",
			vec![rpc_error("could not decrypt key with given password")],
		)])
		.await;
		let signer = NodeAccountSigner::new(expected_address(), Some("wrong".to_owned()), None);

		let err = signer.send(&web3(&node), store_call(None)).await.unwrap_err();
		assert!(matches!(err, Error::Unauthorized(_)));
		assert!(matches!(err.into_attest_error(&node.url), AttestError::AuthorizationError(_)));
	}

	#[tokio::test]
	async fn locked_node_account_should_be_authorization_error() {
		let node = RpcNode::start(vec![(
			"eth_sendTransaction",
			vec![rpc_error("authentication needed: password or unlock")],
		)])
		.await;
		let signer = NodeAccountSigner::new(expected_address(), None, None);

		let err = signer.send(&web3(&node), store_call(None)).await.unwrap_err();
		assert!(node.params("personal_unlockAccount").is_empty());
		assert!(matches!(err.into_attest_error(&node.url), AttestError::AuthorizationError(_)));
	}
}
