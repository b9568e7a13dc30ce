//! Persisted machine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::wiring::Position;

const REQUIRED_KEYS: [&str; 6] = [
	"model",
	"reflector",
	"rotors",
	"rotor_positions",
	"ring_settings",
	"plug_pairs",
];

/// A position as written in a configuration file: a 1-based number or a
/// charset symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionValue {
	Number(usize),
	Symbol(String),
}

impl PositionValue {
	pub fn to_position(&self) -> Result<Position> {
		match self {
			PositionValue::Number(n) => Ok(Position::Number(*n)),
			PositionValue::Symbol(s) => Position::parse(s),
		}
	}
}

impl From<usize> for PositionValue {
	fn from(n: usize) -> Self {
		PositionValue::Number(n)
	}
}

impl From<&str> for PositionValue {
	fn from(s: &str) -> Self {
		PositionValue::Symbol(s.to_string())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
	pub model: String,
	pub reflector: String,
	pub rotors: Vec<String>,
	pub rotor_positions: Vec<PositionValue>,
	pub ring_settings: Vec<PositionValue>,
	pub plug_pairs: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reflector_position: Option<PositionValue>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reflector_pairs: Option<Vec<String>>,
	/// Present iff the Uhr is connected; `plug_pairs` then holds its pairs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uhr_position: Option<usize>,
}

impl MachineConfig {
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		let value: Value = serde_json::from_str(text)?;
		if let Some(map) = value.as_object() {
			if let Some(missing) = REQUIRED_KEYS.iter().copied().find(|k| !map.contains_key(*k)) {
				return Err(ConfigError::MissingKey(missing));
			}
		}
		Ok(serde_json::from_value(value)?)
	}

	pub fn to_json(&self) -> Result<String, ConfigError> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = MachineConfig::from_json(&text)?;
		debug!(path = %path.display(), model = %config.model, "configuration read");
		Ok(config)
	}

	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
		let path = path.as_ref();
		let mut text = self.to_json()?;
		text.push('\n');
		fs::write(path, text).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		debug!(path = %path.display(), "configuration written");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use tempfile::TempDir;

	fn sample() -> MachineConfig {
		MachineConfig {
			model: "Enigma I".to_string(),
			reflector: "UKW-A".to_string(),
			rotors: vec!["II".into(), "I".into(), "III".into()],
			rotor_positions: vec![1usize.into(), 2usize.into(), 12usize.into()],
			ring_settings: vec![24usize.into(), 13usize.into(), 22usize.into()],
			plug_pairs: vec!["AM".into(), "FI".into()],
			reflector_position: None,
			reflector_pairs: None,
			uhr_position: None,
		}
	}

	#[test]
	fn optional_keys_are_omitted() {
		let value: Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
		let map = value.as_object().unwrap();
		assert!(!map.contains_key("reflector_position"));
		assert!(!map.contains_key("reflector_pairs"));
		assert!(!map.contains_key("uhr_position"));
		assert_eq!(map["rotor_positions"], json!([1, 2, 12]));
	}

	#[test]
	fn positions_accept_letters() {
		let text = json!({
			"model": "Enigma I",
			"reflector": "UKW-A",
			"rotors": ["II", "I", "III"],
			"rotor_positions": ["A", "B", 12],
			"ring_settings": [24, "M", 22],
			"plug_pairs": [],
		})
		.to_string();
		let config = MachineConfig::from_json(&text).unwrap();
		assert_eq!(config.rotor_positions[0], PositionValue::Symbol("A".into()));
		assert_eq!(config.rotor_positions[2], PositionValue::Number(12));
		assert_eq!(config.ring_settings[1].to_position().unwrap(), Position::Symbol('M'));
		assert!(config.plug_pairs.is_empty());
	}

	#[test]
	fn missing_and_malformed() {
		let text = json!({"model": "Enigma I", "reflector": "UKW-A", "rotors": []}).to_string();
		assert!(matches!(
			MachineConfig::from_json(&text),
			Err(ConfigError::MissingKey("rotor_positions"))
		));

		let mut value = serde_json::to_value(sample()).unwrap();
		value.as_object_mut().unwrap().remove("plug_pairs");
		assert!(matches!(
			MachineConfig::from_json(&value.to_string()),
			Err(ConfigError::MissingKey("plug_pairs"))
		));
		assert!(matches!(MachineConfig::from_json("{ model"), Err(ConfigError::Malformed(_))));
		assert!(matches!(MachineConfig::from_json("[1, 2]"), Err(ConfigError::Malformed(_))));
	}

	#[test]
	fn file_round_trip() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("machine.json");
		sample().save(&path).unwrap();
		assert_eq!(MachineConfig::load(&path).unwrap(), sample());

		let missing = dir.path().join("absent.json");
		assert!(matches!(MachineConfig::load(&missing), Err(ConfigError::Io { .. })));
	}
}
