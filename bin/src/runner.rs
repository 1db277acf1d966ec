use futures::{
	future::{self, Either},
	pin_mut, Future,
};

use crate::error::Error;

/// Drive `work` to completion unless SIGINT or SIGTERM arrives first.
///
/// Stopping only abandons the local wait, a transaction already handed to the node is not
/// withdrawn.
pub async fn run_until_exit<F, T>(work: F) -> Result<T, Error>
where
	F: Future<Output = Result<T, Error>>,
{
	race(work, stop_signal()).await
}

async fn race<F, S, T>(work: F, stop: S) -> Result<T, Error>
where
	F: Future<Output = Result<T, Error>>,
	S: Future<Output = std::io::Result<()>>,
{
	pin_mut!(work, stop);
	match future::select(work, stop).await {
		Either::Left((res, _)) => res,
		Either::Right((signal, _)) => {
			signal?;
			log::warn!("photo-attest interrupted before the attestation finished");
			Err(Error::Interrupted)
		},
	}
}

#[cfg(unix)]
async fn stop_signal() -> std::io::Result<()> {
	use tokio::signal::unix::{signal, SignalKind};

	let mut interrupt = signal(SignalKind::interrupt())?;
	let mut terminate = signal(SignalKind::terminate())?;
	let int = interrupt.recv();
	let term = terminate.recv();
	pin_mut!(int, term);
	future::select(int, term).await;
	Ok(())
}

#[cfg(not(unix))]
async fn stop_signal() -> std::io::Result<()> {
	tokio::signal::ctrl_c().await
}
