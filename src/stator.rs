use crate::error::Result;
use crate::wiring::Alphabet;

/// Entry wheel (Eintrittswalze). Fixed substitution between the keyboard
/// side and the rotors.
#[derive(Debug, Clone)]
pub struct Stator {
	label: String,
	alphabet: Alphabet,
	wiring: Vec<char>,
}

impl Stator {
	pub fn new(label: &str, alphabet: Alphabet, wiring: &str) -> Self {
		Stator {
			label: label.to_string(),
			alphabet,
			wiring: wiring.chars().collect(),
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn forward(&self, c: char) -> Result<char> {
		Ok(self.wiring[self.alphabet.index(c)?])
	}

	pub fn backward(&self, c: char) -> Result<char> {
		let i = self.alphabet.index_in(&self.wiring, c)?;
		Ok(self.alphabet.symbol(i))
	}
}
