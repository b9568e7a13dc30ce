use crate::error::{EnigmaError, Result};
use crate::wiring::{display_position, wrap, Alphabet};

/// A rotatable wheel (Walze) with ring setting and turnover notches.
///
/// Positions and ring settings are 1-based at the API and 0-based inside.
#[derive(Debug, Clone)]
pub struct Rotor {
	label: String,
	alphabet: Alphabet,
	// forward[i] is the contact index that input contact i is wired to
	forward: Vec<usize>,
	backward: Vec<usize>,
	turnover: Vec<char>,
	offset: usize,
	ring: usize,
}

impl Rotor {
	pub fn new(label: &str, alphabet: Alphabet, wiring: &str, turnover: &str) -> Self {
		let forward: Vec<usize> = wiring
			.chars()
			.map(|c| alphabet.symbols().iter().position(|&s| s == c).unwrap_or(0))
			.collect();

		let mut backward = vec![0; forward.len()];
		for (i, &j) in forward.iter().enumerate() {
			backward[j] = i;
		}

		Rotor {
			label: label.to_string(),
			alphabet,
			forward,
			backward,
			turnover: turnover.chars().collect(),
			offset: 0,
			ring: 0,
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn wiring(&self) -> String {
		self.forward.iter().map(|&i| self.alphabet.symbol(i)).collect()
	}

	fn check_range(&self, what: &str, pos: usize) -> Result<usize> {
		if (1..=self.alphabet.len()).contains(&pos) {
			Ok(pos - 1)
		} else {
			Err(EnigmaError::invalid_argument(format!(
				"rotor {} {} {} outside 1..={}",
				self.label,
				what,
				pos,
				self.alphabet.len()
			)))
		}
	}

	/// Current position, 1-based.
	pub fn offset(&self) -> usize {
		self.offset + 1
	}

	pub fn set_offset(&mut self, pos: usize) -> Result<()> {
		self.offset = self.check_range("position", pos)?;
		Ok(())
	}

	/// Ring setting (Ringstellung), 1-based.
	pub fn ring_offset(&self) -> usize {
		self.ring + 1
	}

	pub fn set_ring_offset(&mut self, pos: usize) -> Result<()> {
		self.ring = self.check_range("ring setting", pos)?;
		Ok(())
	}

	pub fn position(&self, numeric: bool) -> String {
		display_position(&self.alphabet, self.offset, numeric)
	}

	pub fn ring_position(&self, numeric: bool) -> String {
		display_position(&self.alphabet, self.ring, numeric)
	}

	pub fn rotate(&mut self, k: isize) {
		self.offset = wrap(self.offset as isize + k, self.alphabet.len());
	}

	/// Whether the displayed position carries the rotor to the left on the
	/// next keypress.
	pub fn in_turnover(&self) -> bool {
		self.turnover.contains(&self.alphabet.symbol(self.offset))
	}

	fn adjustment(&self) -> isize {
		self.offset as isize - self.ring as isize
	}

	pub fn forward(&self, c: char) -> Result<char> {
		let n = self.alphabet.len();
		let adj = self.adjustment();
		let i = wrap(self.alphabet.index(c)? as isize + adj, n);
		Ok(self.alphabet.symbol(wrap(self.forward[i] as isize - adj, n)))
	}

	pub fn backward(&self, c: char) -> Result<char> {
		let n = self.alphabet.len();
		let adj = self.adjustment();
		let i = wrap(self.alphabet.index(c)? as isize + adj, n);
		Ok(self.alphabet.symbol(wrap(self.backward[i] as isize - adj, n)))
	}
}
