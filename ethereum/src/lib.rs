//! Ethereum side of an attestation: a json-rpc client bound to one deployed contract, the
//! signers that authorize its transactions, and the receipt wait.

pub use client::ContractClient;
pub use error::{Error, Result};
pub use signer::{ContractCall, LocalSigner, NodeAccountSigner, SignerConfig, TransactionSigner};
pub use types::{ContractHandle, EthClient, EthereumConfig, SubmitOptions};

mod client;
mod error;
pub mod signer;
#[cfg(test)]
mod stub;
pub mod types;
pub mod utils;
