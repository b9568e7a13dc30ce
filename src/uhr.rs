//! The Enigma Uhr: a 40-position scrambler that plugs into the plugboard
//! sockets in place of the stecker cables.

use crate::error::{EnigmaError, Result};
use crate::plugboard::{validate_pairs, MAX_PAIRS};
use crate::wiring::{format_pair, wrap, Alphabet};

pub const UHR_PAIRS: usize = 10;
pub const UHR_POSITIONS: usize = 40;

const CONTACTS: usize = 2 * UHR_PAIRS;
const ALPHABET: &[u8; CONTACTS] = b"ABCDEFGHIJKLMNOPQRST";
const BACK_WIRING: &[u8; CONTACTS] = b"NSLAJCTERGPIHKBMDOFQ";
const FRONT_WIRING: &[u8; CONTACTS] = b"DOFQHSJMLENCPARKTIBG";

#[derive(Debug, Clone, Default)]
pub struct Uhr {
	// a0 b0 a1 b1 ... or empty when no plugs are set
	plugs: Vec<char>,
	offset: usize,
}

impl Uhr {
	pub fn new() -> Self {
		Uhr::default()
	}

	pub fn pairs(&self) -> Vec<String> {
		self.plugs.chunks(2).map(|p| format_pair((p[0], p[1]))).collect()
	}

	/// Sets the ten a/b plug pairs, or clears them with an empty list.
	pub fn set_pairs<S: AsRef<str>>(&mut self, pairs: &[S], alphabet: &Alphabet) -> Result<()> {
		if pairs.is_empty() {
			self.plugs.clear();
			return Ok(());
		}

		let parsed = validate_pairs(pairs, alphabet, MAX_PAIRS)?;
		if parsed.len() != UHR_PAIRS {
			return Err(EnigmaError::WrongPairCount {
				expected: UHR_PAIRS,
				actual: parsed.len(),
			});
		}

		self.plugs = parsed.into_iter().flat_map(|(a, b)| [a, b]).collect();
		Ok(())
	}

	pub fn position(&self) -> usize {
		self.offset
	}

	pub fn set_position(&mut self, pos: usize) {
		self.offset = pos % UHR_POSITIONS;
	}

	pub fn rotate(&mut self, k: isize) {
		self.offset = wrap(self.offset as isize + k, UHR_POSITIONS);
	}

	/// Whether the current setting pairs letters reciprocally.
	pub fn is_reciprocal(&self) -> bool {
		self.offset % 4 == 0
	}

	pub fn route(&self, c: char, backward: bool) -> char {
		let i = match self.plugs.iter().position(|&p| p == c) {
			Some(i) => i,
			None => return c,
		};

		// the return contacts only line up with the entry contacts every
		// fourth notch; in between they sit at the last aligned notch
		let (wiring, o) = if backward {
			(FRONT_WIRING, self.offset - self.offset % 4)
		} else {
			(BACK_WIRING, self.offset)
		};

		let j = (i + o) % CONTACTS;
		let r = ALPHABET.iter().position(|&a| a == wiring[j]).unwrap_or(j);
		self.plugs[wrap(r as isize - o as isize, CONTACTS)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PAIRS: [&str; 10] = ["AB", "CD", "EF", "GH", "IJ", "KL", "MN", "OP", "QR", "ST"];

	fn uhr() -> Uhr {
		let mut u = Uhr::new();
		u.set_pairs(&PAIRS, &Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ")).unwrap();
		u
	}

	#[test]
	fn needs_exactly_ten_pairs() {
		let a = Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
		let mut u = Uhr::new();
		assert!(matches!(
			u.set_pairs(&PAIRS[..9], &a),
			Err(EnigmaError::WrongPairCount { expected: 10, actual: 9 })
		));
		assert!(u.set_pairs(&["AB", "BA"], &a).is_err());
		u.set_pairs(&PAIRS, &a).unwrap();
		assert_eq!(u.pairs(), PAIRS.to_vec());
		u.set_pairs::<&str>(&[], &a).unwrap();
		assert!(u.pairs().is_empty());
	}

	#[test]
	fn position_wraps_at_forty() {
		let mut u = Uhr::new();
		u.set_position(41);
		assert_eq!(u.position(), 1);
		u.rotate(-2);
		assert_eq!(u.position(), 39);
	}

	#[test]
	fn unplugged_letters_pass_through() {
		let u = uhr();
		assert_eq!(u.route('Z', false), 'Z');
		assert_eq!(u.route('Z', true), 'Z');
	}

	#[test]
	fn backward_inverts_forward_at_reciprocal_positions() {
		let mut u = uhr();
		for pos in (0..UHR_POSITIONS).step_by(4) {
			u.set_position(pos);
			assert!(u.is_reciprocal());
			for c in 'A'..='T' {
				assert_eq!(u.route(u.route(c, false), true), c, "position {}", pos);
			}
		}
	}

	#[test]
	fn not_inverse_between_reciprocal_positions() {
		let mut u = uhr();
		for pos in (0..UHR_POSITIONS).filter(|p| p % 4 != 0) {
			u.set_position(pos);
			assert!(!u.is_reciprocal());
			let broken = ('A'..='T').any(|c| u.route(u.route(c, false), true) != c);
			assert!(broken, "position {}", pos);
		}
	}

	#[test]
	fn forward_is_a_permutation_of_the_plugs() {
		let mut u = uhr();
		for pos in 0..UHR_POSITIONS {
			u.set_position(pos);
			let mut out: Vec<char> = ('A'..='T').map(|c| u.route(c, false)).collect();
			out.sort_unstable();
			assert_eq!(out, ('A'..='T').collect::<Vec<_>>());
		}
	}
}
