use attest_ethereum::{utils, ContractClient, EthClient, SubmitOptions};
use attest_ipfs::IpfsClient;

use crate::{command::AttestOptions, config::Config, error::Error};

pub async fn attest(options: AttestOptions) -> std::result::Result<(), Error> {
	// load config
	let config = Config::load_from_json(&options.config)?;
	log::info!("[Config] load successfully!");

	// init clients
	let ipfs_client = IpfsClient::new(config.ipfs)?;
	let eth_client = EthClient::new(&config.ethereum.url)?;
	let abi = utils::load_abi(config.ethereum.contract_abi.as_deref())?;
	let handle = eth_client.contract_handle(&config.ethereum.contract_address, &abi)?;
	let signer = config.signer.build()?;
	let contract =
		ContractClient::new(eth_client, handle, signer, SubmitOptions::from(&config.ethereum));
	log::info!("Clients initialized, contract: {:?}", contract.handle().address());

	let receipt =
		attestor::attest(&ipfs_client, &contract, &config.ethereum.method, &options.file).await?;

	println!("Transaction receipt: {}", serde_json::to_string_pretty(&receipt)?);
	Ok(())
}

pub fn template() -> std::result::Result<(), Error> {
	println!("{}", serde_json::to_string_pretty(&Config::template())?);
	Ok(())
}
