//! Attest a file: put it into IPFS, store its hash in the contract, wait for the receipt.

use std::{fmt, path::Path};

use attest_primitives::{
	ContentUploader, ContractInvoker, Error, Receipt, Token, ATTEST_LOG_TARGET,
};

/// The step of an attestation a failure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttestStep {
	Upload,
	Invoke,
	AwaitReceipt,
}

impl fmt::Display for AttestStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			AttestStep::Upload => "upload",
			AttestStep::Invoke => "invoke",
			AttestStep::AwaitReceipt => "await-receipt",
		})
	}
}

#[derive(thiserror::Error, Debug)]
#[error("[{step}] {error}")]
pub struct AttestError {
	pub step: AttestStep,
	#[source]
	pub error: Error,
}

impl AttestError {
	fn at(step: AttestStep) -> impl FnOnce(Error) -> Self {
		move |error| {
			log::error!(target: ATTEST_LOG_TARGET, "attestation aborted at {}: {}", step, error);
			AttestError { step, error }
		}
	}

	pub fn error(&self) -> &Error {
		&self.error
	}
}

/// Upload `path`, call `method(hash)` on the contract and wait until the call is included.
///
/// Every failure aborts the run: nothing is sent to the contract unless the upload produced a
/// hash, and a reverted call is an error even when the receipt itself was fetched.
pub async fn attest<U, C>(
	uploader: &U,
	invoker: &C,
	method: &str,
	path: &Path,
) -> Result<Receipt, AttestError>
where
	U: ContentUploader + ?Sized,
	C: ContractInvoker + ?Sized,
{
	log::info!(target: ATTEST_LOG_TARGET, "attesting {}", path.display());

	let hash = uploader.upload(path).await.map_err(AttestError::at(AttestStep::Upload))?;
	log::info!(target: ATTEST_LOG_TARGET, "Uploaded {} to IPFS, hash: {}", path.display(), hash);

	let tx = invoker
		.invoke(method, &[Token::from(hash)])
		.await
		.map_err(AttestError::at(AttestStep::Invoke))?;

	let receipt =
		invoker.await_receipt(tx).await.map_err(AttestError::at(AttestStep::AwaitReceipt))?;
	if receipt.is_reverted() {
		return Err(AttestError::at(AttestStep::AwaitReceipt)(Error::RevertError(tx)))
	}

	log::info!(
		target: ATTEST_LOG_TARGET,
		"hash stored by tx {:?} in block {:?}",
		receipt.transaction_hash,
		receipt.block_number
	);
	Ok(receipt)
}
