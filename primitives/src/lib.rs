pub use serde::{Deserialize, Serialize};
pub use web3::{
	ethabi::Token,
	types::{Address, H256, U256, U64},
};

pub use error::{Error, Result};
pub use traits::{ContentUploader, ContractInvoker};
pub use types::{ContentHash, Receipt, ReceiptStatus, TxHash};

pub mod error;
pub mod traits;
pub mod types;

pub const ATTEST_LOG_TARGET: &str = "Attest";
pub const IPFS_LOG_TARGET: &str = "IPFS";
pub const ETHEREUM_SUBMIT_LOG_TARGET: &str = "EthereumSubmit";
pub const ETHEREUM_RECEIPT_LOG_TARGET: &str = "EthereumReceipt";

// contract function which stores the content hash
pub const STORE_HASH_METHOD: &str = "storeHash";
