//! Error kinds surfaced by the engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalogue::ComponentKind;

pub type Result<T, E = EnigmaError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnigmaError {
	#[error("unknown model `{0}`")]
	UnknownModel(String),

	#[error("model `{model}` has no {kind} labelled `{label}`")]
	UnknownLabel {
		model: String,
		kind: ComponentKind,
		label: String,
	},

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("invalid pair `{pair}`: {reason}")]
	InvalidPair { pair: String, reason: String },

	#[error("pair `{0}` given more than once")]
	DuplicatePair(String),

	#[error("letter `{0}` appears in more than one pair")]
	DuplicateLetter(char),

	#[error("{count} pairs given, at most {max} allowed")]
	TooManyPairs { count: usize, max: usize },

	#[error("{actual} pairs given, exactly {expected} required")]
	WrongPairCount { expected: usize, actual: usize },

	#[error("letter `{0}` is hard-wired and cannot be paired")]
	HardwiredLetter(char),

	#[error("invalid operation: {0}")]
	InvalidOperation(String),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl EnigmaError {
	pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
		EnigmaError::InvalidArgument(msg.into())
	}

	pub(crate) fn invalid_operation(msg: impl Into<String>) -> Self {
		EnigmaError::InvalidOperation(msg.into())
	}

	pub(crate) fn invalid_pair(pair: &str, reason: impl Into<String>) -> Self {
		EnigmaError::InvalidPair {
			pair: pair.to_string(),
			reason: reason.into(),
		}
	}
}

/// Failures while reading, parsing or applying a persisted configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	#[error("cannot access configuration file {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("malformed configuration: {0}")]
	Malformed(#[from] serde_json::Error),

	#[error("configuration is missing required key `{0}`")]
	MissingKey(&'static str),

	#[error("configuration rejected, previous settings restored: {0}")]
	Rejected(#[source] Box<EnigmaError>),
}
