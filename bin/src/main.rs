use structopt::StructOpt;

mod command;
mod config;
mod entry;
mod error;
mod runner;

use command::Opt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	env_logger::init();
	let opt = Opt::from_args();
	let res = match opt {
		Opt::Attest { options } => runner::run_until_exit(entry::attest(options)).await,
		Opt::Template => entry::template(),
	};
	if let Err(e) = res {
		log::error!("photo-attest failed: {:?}", e);
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
