use std::time::Instant;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use web3::{
	ethabi::Token,
	types::{Bytes, TransactionReceipt, H256, U64},
};

use attest_primitives::{
	ContractInvoker, Receipt, ReceiptStatus, Result as AttestResult, TxHash,
	ETHEREUM_RECEIPT_LOG_TARGET, ETHEREUM_SUBMIT_LOG_TARGET,
};

use super::{
	error::{Error, Result},
	signer::{ContractCall, TransactionSigner},
	types::{ContractHandle, EthClient, SubmitOptions},
};

/// Sends calls to one contract, authorized by the injected signer.
pub struct ContractClient {
	client: EthClient,
	handle: ContractHandle,
	signer: Box<dyn TransactionSigner>,
	options: SubmitOptions,
}

impl ContractClient {
	pub fn new(
		client: EthClient,
		handle: ContractHandle,
		signer: Box<dyn TransactionSigner>,
		options: SubmitOptions,
	) -> Self {
		ContractClient { client, handle, signer, options }
	}

	pub fn handle(&self) -> &ContractHandle {
		&self.handle
	}

	/// Abi encoded input of `method(args)`, checked against the contract abi.
	pub fn encode_call(&self, method: &str, args: &[Token]) -> Result<Vec<u8>> {
		let function = self
			.handle
			.abi()
			.function(method)
			.map_err(|_| Error::UnknownMethod(method.to_owned()))?;
		if function.inputs.len() != args.len() {
			return Err(Error::ArgumentMismatch {
				method: method.to_owned(),
				expected: function.inputs.len(),
				got: args.len(),
			})
		}
		Ok(function.encode_input(args)?)
	}

	pub async fn submit(&self, method: &str, args: &[Token]) -> Result<H256> {
		let data = self.encode_call(method, args)?;
		let call = ContractCall {
			to: self.handle.address(),
			data: Bytes(data),
			gas: self.options.gas,
			chain_id: self.options.chain_id,
		};

		log::info!(
			target: ETHEREUM_SUBMIT_LOG_TARGET,
			"Start submitting: {}({:?}) to contract {:?} from {:?}",
			method,
			args,
			call.to,
			self.signer.address()
		);
		let tx_hash = self.signer.send(self.client.web3(), call).await.map_err(|e| {
			log::error!(target: ETHEREUM_SUBMIT_LOG_TARGET, "submit {} error: {:?}", method, e);
			e
		})?;
		log::info!(target: ETHEREUM_SUBMIT_LOG_TARGET, "submitted {} | tx: {:?}", method, tx_hash);

		Ok(tx_hash)
	}

	/// Wait for the receipt of `tx` with the configured confirmations, bounded by the
	/// receipt timeout. The transaction stays in the pool when the wait gives up.
	pub async fn wait_receipt(&self, tx: H256) -> Result<Receipt> {
		let started = Instant::now();
		let receipt = match timeout(self.options.receipt_timeout, self.poll_receipt(tx)).await {
			Ok(r) => r?,
			Err(_) => {
				log::error!(
					target: ETHEREUM_RECEIPT_LOG_TARGET,
					"no receipt for tx {:?} within {:?}",
					tx,
					self.options.receipt_timeout
				);
				return Err(Error::TimeOutError { tx, elapsed: started.elapsed() })
			},
		};
		settle(tx, receipt.into())
	}

	async fn poll_receipt(&self, tx: H256) -> Result<TransactionReceipt> {
		loop {
			match self.client.eth().transaction_receipt(tx).await? {
				Some(receipt) => match receipt.block_number {
					Some(number) => {
						let best = self.client.best_number().await?;
						if is_confirmed(number, best, self.options.confirmations) {
							log::info!(
								target: ETHEREUM_RECEIPT_LOG_TARGET,
								"tx {:?} included in block {} | best: {}",
								tx,
								number,
								best
							);
							return Ok(receipt)
						}
						log::debug!(
							target: ETHEREUM_RECEIPT_LOG_TARGET,
							"tx {:?} in block {}, waiting for {} confirmations | best: {}",
							tx,
							number,
							self.options.confirmations,
							best
						);
					},
					None => log::debug!(target: ETHEREUM_RECEIPT_LOG_TARGET, "tx {:?} pending", tx),
				},
				None => log::debug!(target: ETHEREUM_RECEIPT_LOG_TARGET, "tx {:?} not mined yet", tx),
			}
			sleep(self.options.poll_interval).await;
		}
	}
}

// the inclusion block counts as the first confirmation
fn is_confirmed(included: U64, best: U64, confirmations: usize) -> bool {
	best.low_u64().saturating_sub(included.low_u64()) + 1 >= confirmations as u64
}

fn settle(tx: H256, receipt: Receipt) -> Result<Receipt> {
	match receipt.status {
		ReceiptStatus::Success => Ok(receipt),
		ReceiptStatus::Reverted => {
			log::error!(target: ETHEREUM_RECEIPT_LOG_TARGET, "tx {:?} reverted", tx);
			Err(Error::Reverted(tx))
		},
		ReceiptStatus::Unknown => {
			log::warn!(
				target: ETHEREUM_RECEIPT_LOG_TARGET,
				"node reports no status for tx {:?}, assuming success",
				tx
			);
			Ok(receipt)
		},
	}
}

#[async_trait]
impl ContractInvoker for ContractClient {
	async fn invoke(&self, method: &str, args: &[Token]) -> AttestResult<TxHash> {
		self.submit(method, args).await.map_err(|e| e.into_attest_error(self.client.url()))
	}

	async fn await_receipt(&self, tx: TxHash) -> AttestResult<Receipt> {
		self.wait_receipt(tx).await.map_err(|e| e.into_attest_error(self.client.url()))
	}
}
