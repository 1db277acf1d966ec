use std::path::Path;

use async_trait::async_trait;
use web3::ethabi::Token;

use crate::{ContentHash, Receipt, Result, TxHash};

/// Puts a local file into content addressed storage.
#[async_trait]
pub trait ContentUploader: Send + Sync {
	async fn upload(&self, path: &Path) -> Result<ContentHash>;
}

/// Sends state changing calls to one deployed contract.
#[async_trait]
pub trait ContractInvoker: Send + Sync {
	/// Sign and submit `method(args)`, returning as soon as the node accepted the transaction.
	async fn invoke(&self, method: &str, args: &[Token]) -> Result<TxHash>;

	/// Wait until `tx` is included. A reverted transaction is an error.
	async fn await_receipt(&self, tx: TxHash) -> Result<Receipt>;
}
