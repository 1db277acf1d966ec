use std::path::PathBuf;

use attest_primitives::Error as AttestError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Invalid ipfs api address: {0}, reason: {1}")]
	InvalidIpfsHost(String, String),

	#[error("Request IPFS error, reason: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Assembly Url error, reason: {0}")]
	UrlError(#[from] url::ParseError),

	#[error("Open file error, path: {}, reason: {source}", .path.display())]
	FileError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("IPFS node responded with status {status}, message: {message}")]
	NodeError { status: u16, message: String },

	#[error("Malformed add response, reason: {0}")]
	MalformedResponse(String),
}

impl Error {
	pub fn into_attest_error(self, endpoint: &str) -> AttestError {
		match self {
			Error::FileError { path, source } => AttestError::IoError { path, source },
			Error::InvalidIpfsHost(..) | Error::UrlError(_) =>
				AttestError::ConfigError(self.to_string()),
			Error::HttpError(_) | Error::NodeError { .. } | Error::MalformedResponse(_) =>
				AttestError::connectivity(endpoint, self),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
