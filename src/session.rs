//! Stateful front of the engine: per-field settings, encryption with a
//! bounded position history, checkpoints and configuration persistence.

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::buffer::{PositionBuffer, DEFAULT_CAPACITY};
use crate::config::{MachineConfig, PositionValue};
use crate::error::{ConfigError, EnigmaError, Result};
use crate::machine::Machine;
use crate::wiring::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UhrAction {
	Connect,
	Disconnect,
	Query,
}

impl FromStr for UhrAction {
	type Err = EnigmaError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"connect" => Ok(UhrAction::Connect),
			"disconnect" => Ok(UhrAction::Disconnect),
			"" | "query" => Ok(UhrAction::Query),
			_ => Err(EnigmaError::invalid_argument(format!("unknown Uhr action `{}`", s))),
		}
	}
}

#[derive(Debug, Clone)]
pub struct Enigma {
	machine: Machine,
	checkpoint: u64,
	buffer: PositionBuffer,
}

impl Enigma {
	pub fn new(model: &str) -> Result<Self> {
		Enigma::with_capacity(model, DEFAULT_CAPACITY)
	}

	pub fn with_capacity(model: &str, capacity: usize) -> Result<Self> {
		let machine = Machine::new(model)?;
		Ok(Enigma {
			checkpoint: machine.serialized_position(),
			buffer: PositionBuffer::new(capacity)?,
			machine,
		})
	}

	/// Builds a machine from a record; its positions become the checkpoint.
	pub fn from_config(config: &MachineConfig) -> Result<Self> {
		let mut enigma = Enigma::new(&config.model)?;
		enigma.load_config(config)?;
		enigma.set_checkpoint();
		Ok(enigma)
	}

	pub fn machine(&self) -> &Machine {
		&self.machine
	}

	pub fn model(&self) -> &'static str {
		self.machine.model().label
	}

	/// Rebuilds the machine as `model` with its defaults. Resets the
	/// checkpoint and clears the position buffer.
	pub fn set_model(&mut self, model: &str) -> Result<()> {
		self.machine = Machine::new(model)?;
		self.reset_history();
		debug!(model, "model switched");
		Ok(())
	}

	fn reset_history(&mut self) {
		self.checkpoint = self.machine.serialized_position();
		self.buffer.clear();
	}

	pub fn reflector(&self) -> &str {
		self.machine.reflector().label()
	}

	/// Fitting or removing UKW-D on a four-rotor model changes the rotor
	/// count, which resets the checkpoint and the position buffer.
	pub fn set_reflector(&mut self, label: &str) -> Result<()> {
		let count = self.machine.rotor_count();
		self.machine.set_reflector(label)?;
		if self.machine.rotor_count() != count {
			self.reset_history();
		}
		Ok(())
	}

	pub fn rotors(&self) -> Vec<String> {
		self.machine.rotor_labels()
	}

	pub fn set_rotors<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
		self.machine.set_rotors(labels)
	}

	pub fn positions(&self) -> Vec<String> {
		self.machine.positions()
	}

	pub fn set_positions(&mut self, positions: &[Position]) -> Result<()> {
		self.machine.set_positions(positions)
	}

	pub fn ring_settings(&self) -> Vec<String> {
		self.machine.ring_settings()
	}

	pub fn set_ring_settings(&mut self, rings: &[Position]) -> Result<()> {
		self.machine.set_ring_settings(rings)
	}

	pub fn plug_pairs(&self) -> Vec<String> {
		self.machine.plug_pairs()
	}

	pub fn set_plug_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		self.machine.set_plug_pairs(pairs)
	}

	pub fn reflector_position(&self) -> Result<String> {
		self.machine.reflector_position()
	}

	pub fn set_reflector_position(&mut self, pos: Position) -> Result<()> {
		self.machine.set_reflector_position(pos)
	}

	pub fn rotate_reflector(&mut self, k: isize) -> Result<()> {
		self.machine.rotate_reflector(k)
	}

	pub fn reflector_pairs(&self) -> Result<Vec<String>> {
		self.machine.reflector_pairs()
	}

	pub fn set_reflector_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		self.machine.set_reflector_pairs(pairs)
	}

	/// Connects, disconnects or queries the Uhr. Returns whether it is
	/// connected afterwards.
	pub fn uhr(&mut self, action: UhrAction) -> Result<bool> {
		match action {
			UhrAction::Connect => self.machine.connect_uhr()?,
			UhrAction::Disconnect => self.machine.disconnect_uhr(),
			UhrAction::Query => {}
		}
		Ok(self.machine.uhr_connected())
	}

	pub fn uhr_position(&self) -> Result<usize> {
		self.machine.uhr_position()
	}

	pub fn set_uhr_position(&mut self, pos: usize) -> Result<()> {
		self.machine.set_uhr_position(pos)
	}

	pub fn press_key(&mut self, key: char) -> Result<char> {
		let out = self.machine.press_key(key)?;
		self.buffer.push(self.machine.serialized_position());
		Ok(out)
	}

	/// Enciphers `text` key by key. Every character must be on the
	/// keyboard; nothing moves if one is not.
	pub fn encrypt(&mut self, text: &str) -> Result<String> {
		for key in text.chars() {
			self.machine.check_key(key)?;
		}
		text.chars().map(|key| self.press_key(key)).collect()
	}

	/// Serialized rotor position.
	pub fn position(&self) -> u64 {
		self.machine.serialized_position()
	}

	pub fn set_position(&mut self, serial: u64) -> Result<()> {
		self.machine.restore_position(serial)
	}

	pub fn buffer(&self) -> &PositionBuffer {
		&self.buffer
	}

	pub fn checkpoint(&self) -> u64 {
		self.checkpoint
	}

	pub fn set_checkpoint(&mut self) {
		self.checkpoint = self.machine.serialized_position();
		debug!(checkpoint = self.checkpoint, "checkpoint set");
	}

	pub fn load_checkpoint(&mut self) -> Result<()> {
		self.machine.restore_position(self.checkpoint)?;
		debug!(checkpoint = self.checkpoint, "checkpoint restored");
		Ok(())
	}

	/// Undoes the last `k` keypresses: drops them from the buffer and
	/// restores the position before them, or the checkpoint once the buffer
	/// runs out.
	pub fn revert_by(&mut self, k: usize) -> Result<()> {
		let mut buffer = self.buffer.clone();
		let target = buffer.truncate_last(k).unwrap_or(self.checkpoint);
		self.machine.restore_position(target)?;
		self.buffer = buffer;
		debug!(k, position = target, "reverted");
		Ok(())
	}

	pub fn config(&self) -> MachineConfig {
		let m = &self.machine;
		MachineConfig {
			model: self.model().to_string(),
			reflector: self.reflector().to_string(),
			rotors: m.rotor_labels(),
			rotor_positions: m.offsets().into_iter().map(PositionValue::Number).collect(),
			ring_settings: m.ring_offsets().into_iter().map(PositionValue::Number).collect(),
			plug_pairs: m.plug_pairs(),
			reflector_position: m.reflector_offset().ok().map(PositionValue::Number),
			reflector_pairs: m.reflector_pairs().ok(),
			uhr_position: m.uhr_position().ok(),
		}
	}

	/// Applies a configuration record. On any failure the previous
	/// configuration stays in place and the cause is returned wrapped in
	/// [`ConfigError::Rejected`].
	pub fn load_config(&mut self, config: &MachineConfig) -> Result<()> {
		let mut staged = self.clone();
		match staged.apply_config(config) {
			Ok(()) => {
				*self = staged;
				debug!(model = %config.model, "configuration applied");
				Ok(())
			}
			Err(err) => {
				warn!(error = %err, "configuration rejected");
				Err(ConfigError::Rejected(Box::new(err)).into())
			}
		}
	}

	fn apply_config(&mut self, config: &MachineConfig) -> Result<()> {
		let model_changed = config.model != self.model();
		let previous = std::mem::replace(&mut self.machine, Machine::new(&config.model)?);

		self.machine.set_reflector(&config.reflector)?;
		if !model_changed {
			if let Some(rotor) = previous.set_aside() {
				self.machine.keep_aside(rotor.clone());
			}
		}
		self.machine.set_rotors(&config.rotors)?;

		let rings = positions_of(&config.ring_settings)?;
		self.machine.set_ring_settings(&rings)?;
		let positions = positions_of(&config.rotor_positions)?;
		self.machine.set_positions(&positions)?;

		if let Some(pairs) = &config.reflector_pairs {
			self.machine.set_reflector_pairs(pairs)?;
		}
		if let Some(pos) = &config.reflector_position {
			self.machine.set_reflector_position(pos.to_position()?)?;
		}
		if let Some(pos) = config.uhr_position {
			self.machine.connect_uhr()?;
			self.machine.set_uhr_position(pos)?;
		}
		if !config.plug_pairs.is_empty() {
			self.machine.set_plug_pairs(&config.plug_pairs)?;
		}

		// serials in the history only fit the old rotor count
		if model_changed || self.machine.rotor_count() != previous.rotor_count() {
			self.reset_history();
		}
		Ok(())
	}

	pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
		let config = MachineConfig::load(path)?;
		self.load_config(&config)
	}

	pub fn save_config_file(&self, path: impl AsRef<Path>) -> Result<()> {
		self.config().save(path)?;
		Ok(())
	}
}

fn positions_of(values: &[PositionValue]) -> Result<Vec<Position>> {
	values.iter().map(PositionValue::to_position).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uhr_actions_parse() {
		assert_eq!("connect".parse::<UhrAction>().unwrap(), UhrAction::Connect);
		assert_eq!("Disconnect".parse::<UhrAction>().unwrap(), UhrAction::Disconnect);
		assert_eq!("".parse::<UhrAction>().unwrap(), UhrAction::Query);
		assert!(matches!("plug".parse::<UhrAction>(), Err(EnigmaError::InvalidArgument(_))));
	}

	#[test]
	fn model_switch_resets_history() {
		let mut e = Enigma::new("Enigma I").unwrap();
		e.encrypt("HELLO").unwrap();
		e.set_checkpoint();
		e.set_model("Enigma M4").unwrap();
		assert_eq!(e.checkpoint(), 1010101);
		assert!(e.buffer().is_empty());
		assert!(matches!(e.set_model("Enigma Y"), Err(EnigmaError::UnknownModel(_))));
		assert_eq!(e.model(), "Enigma M4");
	}

	#[test]
	fn bad_text_leaves_state_alone() {
		let mut e = Enigma::new("Enigma I").unwrap();
		let before = e.position();
		assert!(e.encrypt("HELLO WORLD").is_err());
		assert_eq!(e.position(), before);
		assert!(e.buffer().is_empty());
	}

	#[test]
	fn revert_restores_buffered_positions() {
		let mut e = Enigma::new("Enigma I").unwrap();
		e.encrypt("AAAA").unwrap();
		let after_two = e.buffer().iter().nth(1).unwrap();
		e.revert_by(2).unwrap();
		assert_eq!(e.position(), after_two);
		assert_eq!(e.buffer().len(), 2);
		e.revert_by(5).unwrap();
		assert_eq!(e.position(), e.checkpoint());
		assert!(e.buffer().is_empty());
	}

	#[test]
	fn rejected_config_changes_nothing() {
		let mut e = Enigma::new("Enigma I").unwrap();
		e.set_plug_pairs(&["AB"]).unwrap();
		let before = e.config();

		let mut bad = before.clone();
		bad.model = "Enigma M3".to_string();
		bad.reflector = "UKW-B".to_string();
		bad.plug_pairs = vec!["AB".to_string(), "BC".to_string()];
		let err = e.load_config(&bad).unwrap_err();
		assert!(matches!(err, EnigmaError::Config(ConfigError::Rejected(_))));
		assert_eq!(e.config(), before);
		assert_eq!(e.model(), "Enigma I");
	}
}
