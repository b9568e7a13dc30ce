//! Charset indexing, pair parsing and position parsing shared by every
//! component.

use std::fmt;
use std::str::FromStr;

use crate::error::{EnigmaError, Result};

/// Ordered symbol set of a model. All routing happens on indices into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
	symbols: Vec<char>,
}

impl Alphabet {
	pub fn new(charset: &str) -> Self {
		Alphabet {
			symbols: charset.chars().collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	pub fn contains(&self, c: char) -> bool {
		self.symbols.contains(&c)
	}

	pub fn index(&self, c: char) -> Result<usize> {
		self.symbols
			.iter()
			.position(|&s| s == c)
			.ok_or_else(|| self.not_in_charset(c))
	}

	/// Symbol at `i`, wrapping around the charset.
	pub fn symbol(&self, i: usize) -> char {
		self.symbols[i % self.symbols.len()]
	}

	pub fn symbols(&self) -> &[char] {
		&self.symbols
	}

	/// Looks up `c` in `wiring`, which is a permutation of this charset.
	pub(crate) fn index_in(&self, wiring: &[char], c: char) -> Result<usize> {
		wiring
			.iter()
			.position(|&s| s == c)
			.ok_or_else(|| self.not_in_charset(c))
	}

	fn not_in_charset(&self, c: char) -> EnigmaError {
		EnigmaError::invalid_argument(format!("key `{}` is not in charset {}", c, self))
	}
}

impl fmt::Display for Alphabet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for c in &self.symbols {
			write!(f, "{}", c)?;
		}
		Ok(())
	}
}

/// `value mod n`, always non-negative.
pub(crate) fn wrap(value: isize, n: usize) -> usize {
	value.rem_euclid(n as isize) as usize
}

/// A rotor, ring or reflector position as supplied by a caller: either a
/// 1-based number or a charset symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
	Number(usize),
	Symbol(char),
}

impl Position {
	/// Parses one token. Tokens made only of digits are numbers.
	pub fn parse(token: &str) -> Result<Self> {
		let token = token.trim();
		if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
			return token.parse().map(Position::Number).map_err(|_| {
				EnigmaError::invalid_argument(format!("position `{}` is too large", token))
			});
		}

		let mut chars = token.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Ok(Position::Symbol(c.to_ascii_uppercase())),
			_ => Err(EnigmaError::invalid_argument(format!("`{}` is not a position", token))),
		}
	}

	/// Resolves to a 1-based position within `alphabet`.
	pub fn resolve(self, alphabet: &Alphabet) -> Result<usize> {
		match self {
			Position::Number(n) if (1..=alphabet.len()).contains(&n) => Ok(n),
			Position::Number(n) => Err(EnigmaError::invalid_argument(format!(
				"position {} outside 1..={}",
				n,
				alphabet.len()
			))),
			Position::Symbol(c) => alphabet.index(c).map(|i| i + 1),
		}
	}
}

impl FromStr for Position {
	type Err = EnigmaError;

	fn from_str(s: &str) -> Result<Self> {
		Position::parse(s)
	}
}

impl From<usize> for Position {
	fn from(n: usize) -> Self {
		Position::Number(n)
	}
}

impl From<char> for Position {
	fn from(c: char) -> Self {
		Position::Symbol(c)
	}
}

/// Splits a position list. Accepts separate tokens (`"1 2 12"`, `"A,B,L"`)
/// or one run of symbols (`"ABL"`) when it has exactly `count` characters.
pub fn parse_positions(input: &str, count: usize) -> Result<Vec<Position>> {
	let tokens: Vec<&str> = input
		.split(|c: char| c.is_whitespace() || c == ',')
		.filter(|t| !t.is_empty())
		.collect();

	if tokens.len() == 1 && tokens[0].chars().count() == count && count > 1 {
		let run = tokens[0];
		if !run.chars().all(|c| c.is_ascii_digit()) {
			return Ok(run.chars().map(|c| Position::Symbol(c.to_ascii_uppercase())).collect());
		}
	}

	tokens.into_iter().map(Position::parse).collect()
}

/// Formats a 0-based offset for display: the charset symbol, or the
/// zero-padded 1-based number when `numeric` is set.
pub fn display_position(alphabet: &Alphabet, offset: usize, numeric: bool) -> String {
	if numeric {
		format!("{:02}", offset + 1)
	} else {
		alphabet.symbol(offset).to_string()
	}
}

/// Parses a two-letter pair over `alphabet`.
pub fn parse_pair(pair: &str, alphabet: &Alphabet) -> Result<(char, char)> {
	let letters: Vec<char> = pair.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
	if letters.len() != 2 {
		return Err(EnigmaError::invalid_pair(pair, "a pair has exactly two letters"));
	}

	let (a, b) = (letters[0], letters[1]);
	for c in [a, b] {
		if !alphabet.contains(c) {
			let reason = format!("`{}` is not in charset {}", c, alphabet);
			return Err(EnigmaError::invalid_pair(pair, reason));
		}
	}

	if a == b {
		return Err(EnigmaError::invalid_pair(pair, "a letter cannot be paired with itself"));
	}

	Ok((a, b))
}

/// Order-insensitive membership test.
pub fn contains_pair(pairs: &[(char, char)], pair: (char, char)) -> bool {
	pairs
		.iter()
		.any(|&(a, b)| (a, b) == pair || (b, a) == pair)
}

pub fn format_pair(pair: (char, char)) -> String {
	let mut s = String::with_capacity(2);
	s.push(pair.0);
	s.push(pair.1);
	s
}
