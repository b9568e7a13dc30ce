//! Plugboard (Steckerbrett) and the accessory slot it shares with the Uhr.

use crate::error::{EnigmaError, Result};
use crate::uhr::Uhr;
use crate::wiring::{contains_pair, format_pair, parse_pair, Alphabet};

pub const MAX_PAIRS: usize = 13;

/// Checks a pair list and returns it parsed. At most `max` pairs, each two
/// distinct charset letters, no pair twice and no letter in two pairs.
pub fn validate_pairs<S: AsRef<str>>(
	pairs: &[S],
	alphabet: &Alphabet,
	max: usize,
) -> Result<Vec<(char, char)>> {
	if pairs.len() > max {
		return Err(EnigmaError::TooManyPairs {
			count: pairs.len(),
			max,
		});
	}

	let mut parsed: Vec<(char, char)> = Vec::with_capacity(pairs.len());
	for raw in pairs {
		let pair = parse_pair(raw.as_ref(), alphabet)?;
		if contains_pair(&parsed, pair) {
			return Err(EnigmaError::DuplicatePair(raw.as_ref().to_string()));
		}
		for c in [pair.0, pair.1] {
			if parsed.iter().any(|&(a, b)| a == c || b == c) {
				return Err(EnigmaError::DuplicateLetter(c));
			}
		}
		parsed.push(pair);
	}

	Ok(parsed)
}

#[derive(Debug, Clone)]
pub struct Plugboard {
	alphabet: Alphabet,
	pairs: Vec<(char, char)>,
}

impl Plugboard {
	pub fn new(alphabet: Alphabet) -> Self {
		Plugboard {
			alphabet,
			pairs: Vec::new(),
		}
	}

	pub fn pairs(&self) -> Vec<String> {
		self.pairs.iter().copied().map(format_pair).collect()
	}

	pub fn set_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		self.pairs = validate_pairs(pairs, &self.alphabet, MAX_PAIRS)?;
		Ok(())
	}

	pub fn route(&self, c: char) -> char {
		for &(a, b) in &self.pairs {
			if c == a {
				return b;
			}
			if c == b {
				return a;
			}
		}
		c
	}
}

/// What sits between the keyboard and the entry wheel.
#[derive(Debug, Clone)]
pub enum Accessory {
	None,
	Plugboard(Plugboard),
	Uhr(Uhr),
}

impl Accessory {
	/// Routes `c` on the way in (`backward == false`) or on the way back to
	/// the lamps. Only the Uhr tells the two apart.
	pub fn route(&self, c: char, backward: bool) -> char {
		match self {
			Accessory::None => c,
			Accessory::Plugboard(p) => p.route(c),
			Accessory::Uhr(u) => u.route(c, backward),
		}
	}

	pub fn pairs(&self) -> Vec<String> {
		match self {
			Accessory::None => Vec::new(),
			Accessory::Plugboard(p) => p.pairs(),
			Accessory::Uhr(u) => u.pairs(),
		}
	}
}
