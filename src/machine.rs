//! The assembled machine: stepping, signal path and component swaps.

use tracing::{debug, trace};

use crate::catalogue::{self, ModelSpec};
use crate::error::{EnigmaError, Result};
use crate::plugboard::{Accessory, Plugboard};
use crate::reflector::Reflector;
use crate::rotor::Rotor;
use crate::stator::Stator;
use crate::uhr::Uhr;
use crate::wiring::{Alphabet, Position};

#[derive(Debug, Clone)]
pub struct Machine {
	model: &'static ModelSpec,
	alphabet: Alphabet,
	stator: Stator,
	reflector: Reflector,
	// left to right; the last one is the fast rotor
	rotors: Vec<Rotor>,
	accessory: Accessory,
	// leftmost rotor of a four-rotor model while UKW-D is fitted
	set_aside: Option<Rotor>,
}

impl Machine {
	/// Builds `model_label` with its default reflector and rotors, all at
	/// position 1 with ring setting 1 and an empty plugboard.
	pub fn new(model_label: &str) -> Result<Self> {
		let model = catalogue::model(model_label)?;
		let (reflector, labels) = catalogue::default_configuration(model.label, model.rotor_count)?;
		let rotors = labels
			.iter()
			.map(|l| catalogue::build_rotor(model, l))
			.collect::<Result<Vec<_>>>()?;

		let accessory = if model.plugboard {
			Accessory::Plugboard(Plugboard::new(model.alphabet()))
		} else {
			Accessory::None
		};

		let mut machine = Machine {
			model,
			alphabet: model.alphabet(),
			stator: catalogue::build_stator(model),
			reflector: catalogue::build_reflector(model, reflector)?,
			rotors,
			accessory,
			set_aside: None,
		};
		// a default reflector may itself be the UKW-D
		machine.fit_rotor_count();
		debug!(model = model.label, "machine built");
		Ok(machine)
	}

	pub fn model(&self) -> &'static ModelSpec {
		self.model
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn rotor_count(&self) -> usize {
		self.rotors.len()
	}

	pub fn rotors(&self) -> &[Rotor] {
		&self.rotors
	}

	pub fn reflector(&self) -> &Reflector {
		&self.reflector
	}

	pub fn stator(&self) -> &Stator {
		&self.stator
	}

	pub fn accessory(&self) -> &Accessory {
		&self.accessory
	}

	fn fit_rotor_count(&mut self) {
		if self.reflector.is_rewirable() && self.model.rotor_count == 4 && self.rotors.len() == 4 {
			self.set_aside = Some(self.rotors.remove(0));
		} else if !self.reflector.is_rewirable() {
			if let Some(rotor) = self.set_aside.take() {
				self.rotors.insert(0, rotor);
			}
		}
	}

	/// Leftmost rotor taken out while UKW-D is fitted to a four-rotor model.
	pub fn set_aside(&self) -> Option<&Rotor> {
		self.set_aside.as_ref()
	}

	/// Replaces the set-aside rotor. No-op unless one is set aside.
	pub(crate) fn keep_aside(&mut self, rotor: Rotor) {
		if self.set_aside.is_some() {
			self.set_aside = Some(rotor);
		}
	}

	pub fn set_reflector(&mut self, label: &str) -> Result<()> {
		self.reflector = catalogue::build_reflector(self.model, label)?;
		self.fit_rotor_count();
		debug!(reflector = label, rotors = self.rotors.len(), "reflector fitted");
		Ok(())
	}

	pub fn rotor_labels(&self) -> Vec<String> {
		self.rotors.iter().map(|r| r.label().to_string()).collect()
	}

	/// Replaces every rotor. The new rotors start at position 1, ring 1.
	pub fn set_rotors<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
		if labels.len() != self.rotors.len() {
			return Err(EnigmaError::invalid_argument(format!(
				"expected {} rotors, got {}",
				self.rotors.len(),
				labels.len()
			)));
		}

		let rotors = labels
			.iter()
			.map(|l| catalogue::build_rotor(self.model, l.as_ref()))
			.collect::<Result<Vec<_>>>()?;
		self.rotors = rotors;
		debug!(rotors = ?self.rotor_labels(), "rotors fitted");
		Ok(())
	}

	fn resolve_all(&self, what: &str, values: &[Position]) -> Result<Vec<usize>> {
		if values.len() != self.rotors.len() {
			return Err(EnigmaError::invalid_argument(format!(
				"expected {} {}, got {}",
				self.rotors.len(),
				what,
				values.len()
			)));
		}
		values.iter().map(|p| p.resolve(&self.alphabet)).collect()
	}

	pub fn positions(&self) -> Vec<String> {
		self.rotors.iter().map(|r| r.position(self.model.numeric_display)).collect()
	}

	/// 1-based rotor positions, left to right.
	pub fn offsets(&self) -> Vec<usize> {
		self.rotors.iter().map(Rotor::offset).collect()
	}

	pub fn set_positions(&mut self, positions: &[Position]) -> Result<()> {
		let resolved = self.resolve_all("positions", positions)?;
		for (rotor, pos) in self.rotors.iter_mut().zip(resolved) {
			rotor.set_offset(pos)?;
		}
		Ok(())
	}

	pub fn ring_settings(&self) -> Vec<String> {
		self.rotors.iter().map(|r| r.ring_position(self.model.numeric_display)).collect()
	}

	pub fn ring_offsets(&self) -> Vec<usize> {
		self.rotors.iter().map(Rotor::ring_offset).collect()
	}

	pub fn set_ring_settings(&mut self, rings: &[Position]) -> Result<()> {
		let resolved = self.resolve_all("ring settings", rings)?;
		for (rotor, ring) in self.rotors.iter_mut().zip(resolved) {
			rotor.set_ring_offset(ring)?;
		}
		Ok(())
	}

	pub fn plug_pairs(&self) -> Vec<String> {
		self.accessory.pairs()
	}

	/// Sets the plugboard pairs, or the Uhr's ten pairs while it is connected.
	pub fn set_plug_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		match &mut self.accessory {
			Accessory::None => Err(EnigmaError::invalid_operation(format!(
				"{} has no plugboard",
				self.model.label
			))),
			Accessory::Plugboard(p) => p.set_pairs(pairs),
			Accessory::Uhr(u) => u.set_pairs(pairs, &self.alphabet),
		}
	}

	pub fn reflector_position(&self) -> Result<String> {
		self.reflector.position(self.model.numeric_display)
	}

	pub fn reflector_offset(&self) -> Result<usize> {
		self.reflector.offset()
	}

	pub fn set_reflector_position(&mut self, pos: Position) -> Result<()> {
		if !self.reflector.is_rotatable() {
			return Err(EnigmaError::invalid_operation(format!(
				"reflector {} cannot be rotated",
				self.reflector.label()
			)));
		}
		let pos = pos.resolve(&self.alphabet)?;
		self.reflector.set_offset(pos)
	}

	pub fn rotate_reflector(&mut self, k: isize) -> Result<()> {
		self.reflector.rotate(k)
	}

	pub fn reflector_pairs(&self) -> Result<Vec<String>> {
		self.reflector.pairs()
	}

	pub fn set_reflector_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		self.reflector.rewire(pairs)
	}

	pub fn uhr_connected(&self) -> bool {
		matches!(self.accessory, Accessory::Uhr(_))
	}

	/// Puts an unplugged Uhr in place of the plugboard.
	pub fn connect_uhr(&mut self) -> Result<()> {
		if !self.model.plugboard {
			return Err(EnigmaError::invalid_operation(format!(
				"{} has no plugboard to connect an Uhr to",
				self.model.label
			)));
		}
		self.accessory = Accessory::Uhr(Uhr::new());
		debug!("uhr connected");
		Ok(())
	}

	/// Puts an empty plugboard back in place of the Uhr. No-op without an Uhr.
	pub fn disconnect_uhr(&mut self) {
		if self.uhr_connected() {
			self.accessory = Accessory::Plugboard(Plugboard::new(self.alphabet.clone()));
			debug!("uhr disconnected");
		}
	}

	pub fn uhr_position(&self) -> Result<usize> {
		match &self.accessory {
			Accessory::Uhr(u) => Ok(u.position()),
			_ => Err(EnigmaError::invalid_operation("no Uhr connected")),
		}
	}

	pub fn set_uhr_position(&mut self, pos: usize) -> Result<()> {
		match &mut self.accessory {
			Accessory::Uhr(u) => {
				u.set_position(pos);
				Ok(())
			}
			_ => Err(EnigmaError::invalid_operation("no Uhr connected")),
		}
	}

	/// Rotor positions as one integer: each 1-based position as a two-digit
	/// field, left to right.
	pub fn serialized_position(&self) -> u64 {
		self.rotors
			.iter()
			.fold(0, |acc, r| acc * 100 + r.offset() as u64)
	}

	pub fn restore_position(&mut self, serial: u64) -> Result<()> {
		let n = self.alphabet.len() as u64;
		let malformed = || {
			EnigmaError::invalid_argument(format!("{} is not a serialized position", serial))
		};
		let mut rest = serial;
		let mut fields = vec![0; self.rotors.len()];
		for field in fields.iter_mut().rev() {
			let pos = rest % 100;
			if pos == 0 || pos > n {
				return Err(malformed());
			}
			*field = pos as usize;
			rest /= 100;
		}
		if rest != 0 {
			return Err(malformed());
		}

		for (rotor, pos) in self.rotors.iter_mut().zip(fields) {
			rotor.set_offset(pos)?;
		}
		Ok(())
	}

	fn advance_rotors(&mut self) {
		let n = self.rotors.len();
		if n >= 2 {
			// both notches are sampled before anything moves
			let fast_carry = self.rotors[n - 1].in_turnover();
			let double_step = n >= 3 && self.rotors[n - 2].in_turnover();

			if fast_carry || double_step {
				self.rotors[n - 2].rotate(1);
			}
			if double_step {
				self.rotors[n - 3].rotate(1);
			}
		}
		if let Some(fast) = self.rotors.last_mut() {
			fast.rotate(1);
		}
	}

	fn route(&self, c: char) -> Result<char> {
		let mut c = self.accessory.route(c, false);
		c = self.stator.forward(c)?;

		for rotor in self.rotors.iter().rev() {
			c = rotor.forward(c)?;
		}

		c = self.reflector.reflect(c)?;

		for rotor in &self.rotors {
			c = rotor.backward(c)?;
		}

		c = self.stator.backward(c)?;
		Ok(self.accessory.route(c, true))
	}

	pub fn check_key(&self, key: char) -> Result<()> {
		if self.alphabet.contains(key) {
			Ok(())
		} else {
			Err(EnigmaError::invalid_argument(format!(
				"key `{}` is not on the {} keyboard",
				key, self.model.label
			)))
		}
	}

	/// Steps the rotors, then enciphers one key.
	pub fn press_key(&mut self, key: char) -> Result<char> {
		self.check_key(key)?;
		self.advance_rotors();
		let out = self.route(key)?;
		trace!(key = %key, out = %out, position = self.serialized_position(), "keypress");
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn positions(s: &str) -> Vec<Position> {
		s.chars().map(Position::Symbol).collect()
	}

	#[test]
	fn defaults() {
		let m = Machine::new("Enigma M4").unwrap();
		assert_eq!(m.rotor_labels(), vec!["Beta", "I", "II", "III"]);
		assert_eq!(m.reflector().label(), "UKW-b");
		assert_eq!(m.serialized_position(), 1010101);
		assert!(matches!(Machine::new("Enigma Q"), Err(EnigmaError::UnknownModel(_))));
	}

	#[test]
	fn double_step() {
		let mut m = Machine::new("Enigma I").unwrap();
		m.set_rotors(&["I", "II", "III"]).unwrap();
		m.set_positions(&positions("ADU")).unwrap();

		let mut seen = Vec::new();
		for _ in 0..3 {
			m.press_key('A').unwrap();
			seen.push(m.positions().concat());
		}
		// Enigma I shows numbers
		assert_eq!(seen, vec!["010422", "010523", "020624"]);
	}

	#[test]
	fn leftmost_rotor_of_m4_never_steps() {
		let mut m = Machine::new("Enigma M4").unwrap();
		m.set_rotors(&["Beta", "VI", "VII", "VIII"]).unwrap();
		m.set_positions(&positions("ALZZ")).unwrap();
		for _ in 0..2000 {
			m.press_key('Q').unwrap();
			assert_eq!(m.rotors()[0].offset(), 1);
		}
	}

	#[test]
	fn ukw_d_sets_the_fourth_rotor_aside() {
		let mut m = Machine::new("Enigma M4").unwrap();
		m.set_reflector("UKW-D").unwrap();
		assert_eq!(m.rotor_labels(), vec!["I", "II", "III"]);
		assert_eq!(m.serialized_position(), 10101);
		assert_eq!(m.set_aside().map(Rotor::label), Some("Beta"));

		m.set_reflector("UKW-c").unwrap();
		assert_eq!(m.rotor_labels(), vec!["Beta", "I", "II", "III"]);
	}

	#[test]
	fn keys_outside_charset_are_rejected_without_stepping() {
		let mut m = Machine::new("Enigma I").unwrap();
		let before = m.serialized_position();
		assert!(matches!(m.press_key('a'), Err(EnigmaError::InvalidArgument(_))));
		assert!(matches!(m.press_key('7'), Err(EnigmaError::InvalidArgument(_))));
		assert_eq!(m.serialized_position(), before);
	}

	#[test]
	fn no_plugboard_no_plugs() {
		let mut m = Machine::new("Enigma D").unwrap();
		assert!(matches!(m.set_plug_pairs(&["AB"]), Err(EnigmaError::InvalidOperation(_))));
		assert!(matches!(m.connect_uhr(), Err(EnigmaError::InvalidOperation(_))));
	}

	#[test]
	fn rotatable_reflector_is_gated() {
		let mut m = Machine::new("Enigma K").unwrap();
		m.set_reflector_position(Position::Symbol('C')).unwrap();
		assert_eq!(m.reflector_position().unwrap(), "C");
		m.rotate_reflector(-3).unwrap();
		assert_eq!(m.reflector_offset().unwrap(), 26);

		let mut m = Machine::new("Enigma I").unwrap();
		assert!(matches!(
			m.set_reflector_position(Position::Number(2)),
			Err(EnigmaError::InvalidOperation(_))
		));
		assert!(m.reflector_position().is_err());
	}

	#[test]
	fn uhr_swap() {
		let mut m = Machine::new("Enigma I").unwrap();
		m.set_plug_pairs(&["AB"]).unwrap();
		assert!(m.uhr_position().is_err());

		m.connect_uhr().unwrap();
		assert!(m.uhr_connected());
		assert!(m.plug_pairs().is_empty());
		assert!(matches!(m.set_plug_pairs(&["AB"]), Err(EnigmaError::WrongPairCount { .. })));
		m.set_uhr_position(27).unwrap();
		assert_eq!(m.uhr_position().unwrap(), 27);

		m.disconnect_uhr();
		assert!(!m.uhr_connected());
		assert!(m.plug_pairs().is_empty());
		m.set_plug_pairs(&["AB"]).unwrap();
	}

	#[test]
	fn serialized_positions_round_trip() {
		let mut m = Machine::new("Enigma I").unwrap();
		m.set_positions(&positions("ABL")).unwrap();
		assert_eq!(m.serialized_position(), 10212);

		m.set_positions(&positions("ZZZ")).unwrap();
		m.restore_position(10212).unwrap();
		assert_eq!(m.offsets(), vec![1, 2, 12]);

		assert!(m.restore_position(10227).is_err());
		assert!(m.restore_position(1010212).is_err());
		assert!(m.restore_position(10012).is_err());
		assert_eq!(m.offsets(), vec![1, 2, 12]);
	}

	#[test]
	fn wrong_length_settings_are_rejected() {
		let mut m = Machine::new("Enigma I").unwrap();
		assert!(m.set_positions(&positions("AB")).is_err());
		assert!(m.set_ring_settings(&[Position::Number(1)]).is_err());
		assert!(m.set_rotors(&["I", "II"]).is_err());
		assert!(matches!(m.set_rotors(&["I", "II", "IX"]), Err(EnigmaError::UnknownLabel { .. })));
		assert_eq!(m.rotor_labels(), vec!["I", "II", "III"]);
	}
}
