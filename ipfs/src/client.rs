use std::{borrow::Cow, path::Path, str::FromStr, time::Duration};

use async_trait::async_trait;
use multiaddr::{Multiaddr, Protocol};
use reqwest::{
	multipart::{Form, Part},
	Body, Client,
};
use serde::Deserialize;
use tokio::fs::File;
use url::Url;

use attest_primitives::{
	ContentHash, ContentUploader, Result as AttestResult, IPFS_LOG_TARGET,
};

use super::{Error, IpfsConfig, Result};

const IPFS_ADD_PATH: &str = "api/v0/add";
const IPFS_API_DEFAULT_PORT: u16 = 5001;

/// Turn the configured api address into the base url of the HTTP api.
///
/// Accepts `http(s)://` urls as they are, and multiaddrs made of one host component
/// (`ip4`, `ip6`, `dns`, `dns4`, `dns6`), an optional `tcp` port and an optional `http`/`https`
/// scheme, e.g. `/ip4/127.0.0.1/tcp/5001/http`.
pub fn api_base_url(addr: &str) -> Result<Url> {
	if addr.starts_with("http://") || addr.starts_with("https://") {
		let mut url = Url::parse(addr)?;
		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());
			url.set_path(&path);
		}
		return Ok(url)
	}

	let invalid = |reason: String| Error::InvalidIpfsHost(addr.to_owned(), reason);
	let multiaddr = Multiaddr::from_str(addr).map_err(|e| invalid(e.to_string()))?;

	let mut host: Option<String> = None;
	let mut port = IPFS_API_DEFAULT_PORT;
	let mut scheme = "http";
	for protocol in multiaddr.iter() {
		match protocol {
			Protocol::Ip4(ip) => host = Some(ip.to_string()),
			Protocol::Ip6(ip) => host = Some(format!("[{}]", ip)),
			Protocol::Dns(name) | Protocol::Dns4(name) | Protocol::Dns6(name) =>
				host = Some(Cow::into_owned(name)),
			Protocol::Tcp(p) => port = p,
			Protocol::Http => scheme = "http",
			Protocol::Https => scheme = "https",
			other => return Err(invalid(format!("unsupported protocol {}", other))),
		}
	}
	let host = host.ok_or_else(|| invalid("no host component".to_owned()))?;

	Ok(Url::parse(&format!("{}://{}:{}/", scheme, host, port))?)
}

/// Client of the IPFS daemon HTTP api.
#[derive(Clone, Debug)]
pub struct IpfsClient {
	// e.g. http://127.0.0.1:5001/api/v0/add
	add_url: Url,
	config: IpfsConfig,
}

impl IpfsClient {
	pub fn new(config: IpfsConfig) -> Result<Self> {
		let add_url = api_base_url(&config.api_multiaddr)?.join(IPFS_ADD_PATH)?;
		log::debug!(target: IPFS_LOG_TARGET, "ipfs add endpoint is {}", add_url);
		Ok(IpfsClient { add_url, config })
	}

	pub fn add_url(&self) -> &Url {
		&self.add_url
	}

	/// Stream the file at `path` to the node and return the hash the node assigned to it.
	pub async fn add_file(&self, path: &Path) -> Result<ContentHash> {
		log::info!(target: IPFS_LOG_TARGET, "Start uploading file: {}", path.display());

		let file_error = |source| Error::FileError { path: path.to_owned(), source };
		let file = File::open(path).await.map_err(file_error)?;
		let len = file.metadata().await.map_err(file_error)?.len();
		let file_name = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_else(|| "file".to_owned());
		let form =
			Form::new().part("file", Part::stream_with_length(Body::from(file), len).file_name(file_name));

		// the client and its connections are dropped with this call
		let client = Client::builder()
			.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
			.timeout(Duration::from_secs(self.config.timeout_secs))
			.build()?;

		let params = [
			("pin", self.config.pin.to_string()),
			("cid-version", self.config.cid_version.to_string()),
			("progress", "false".to_owned()),
		];
		let mut request = client.post(self.add_url.clone()).query(&params).multipart(form);
		if let Some(auth) = &self.config.auth {
			request = request.basic_auth(&auth.username, auth.password.as_ref());
		}

		let response = request.send().await.map_err(|e| {
			log::error!(target: IPFS_LOG_TARGET, "ipfs client upload error. reason: {:?}", e);
			e
		})?;
		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(Error::NodeError { status: status.as_u16(), message: node_error_message(&body) })
		}

		let hash = parse_add_response(&body)?;
		log::info!(
			target: IPFS_LOG_TARGET,
			"file {} ({} bytes) uploaded, hash: {}",
			path.display(),
			len,
			hash
		);
		Ok(hash)
	}
}

#[async_trait]
impl ContentUploader for IpfsClient {
	async fn upload(&self, path: &Path) -> AttestResult<ContentHash> {
		self.add_file(path).await.map_err(|e| e.into_attest_error(self.add_url.as_str()))
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
	#[serde(default)]
	name: String,
	hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeErrorResponse {
	message: String,
}

// the add endpoint streams one json object per line, the last one describes the root object
fn parse_add_response(body: &str) -> Result<ContentHash> {
	let line = body
		.lines()
		.map(str::trim)
		.filter(|l| !l.is_empty())
		.last()
		.ok_or_else(|| Error::MalformedResponse("empty body".to_owned()))?;
	let added: AddResponse =
		serde_json::from_str(line).map_err(|e| Error::MalformedResponse(e.to_string()))?;
	log::debug!(target: IPFS_LOG_TARGET, "add response for {:?}: {}", added.name, added.hash);
	ContentHash::new(added.hash)
		.ok_or_else(|| Error::MalformedResponse("empty hash in add response".to_owned()))
}

fn node_error_message(body: &str) -> String {
	match serde_json::from_str::<NodeErrorResponse>(body) {
		Ok(e) => e.message,
		Err(_) => body.trim().to_owned(),
	}
}
