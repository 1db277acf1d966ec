use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "photo-attest", about = "Store the IPFS hash of a photo in an Ethereum contract")]
pub enum Opt {
	///Upload a photo to IPFS and store its hash in the contract
	Attest {
		#[structopt(flatten)]
		options: AttestOptions,
	},
	///Print a config file template
	Template,
}

#[derive(Debug, Clone, StructOpt)]
pub struct AttestOptions {
	///The config file path
	#[structopt(short, long, parse(from_os_str), default_value = "config.json")]
	pub config: PathBuf,

	///The photo to attest
	#[structopt(parse(from_os_str))]
	pub file: PathBuf,
}
