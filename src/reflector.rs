//! Reflectors (Umkehrwalze), including the field-rewirable UKW-D.

use crate::error::{EnigmaError, Result};
use crate::wiring::{display_position, wrap, Alphabet};

/// German contact marking of the UKW-D. The blanks at 0 and 13 are the
/// contacts hard-wired together, marked J and Y on the wheel.
const MARKING: [char; 26] = [
	' ', 'Z', 'X', 'W', 'V', 'U', 'T', 'S', 'R', 'Q', 'P', 'O', 'N',
	' ', 'M', 'L', 'K', 'I', 'H', 'G', 'F', 'E', 'D', 'C', 'B', 'A',
];
const HARDWIRED: [(char, usize); 2] = [('J', 0), ('Y', 13)];
const REWIRABLE_PAIRS: usize = 12;

#[derive(Debug, Clone)]
pub struct Reflector {
	label: String,
	alphabet: Alphabet,
	wiring: Vec<usize>,
	rotatable: bool,
	rewirable: bool,
	offset: usize,
}

impl Reflector {
	pub fn new(label: &str, alphabet: Alphabet, wiring: &str, rotatable: bool) -> Self {
		let wiring = wiring
			.chars()
			.map(|c| alphabet.symbols().iter().position(|&s| s == c).unwrap_or(0))
			.collect();

		Reflector {
			label: label.to_string(),
			alphabet,
			wiring,
			rotatable,
			rewirable: false,
			offset: 0,
		}
	}

	/// Builds a UKW-D from 12 pairs in German marking.
	pub fn rewirable<S: AsRef<str>>(label: &str, alphabet: Alphabet, pairs: &[S]) -> Result<Self> {
		if alphabet.len() != MARKING.len() {
			return Err(EnigmaError::invalid_operation(format!(
				"{} needs a {}-letter charset",
				label,
				MARKING.len()
			)));
		}

		Ok(Reflector {
			label: label.to_string(),
			wiring: wiring_from_pairs(pairs)?,
			alphabet,
			rotatable: false,
			rewirable: true,
			offset: 0,
		})
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn is_rotatable(&self) -> bool {
		self.rotatable
	}

	pub fn is_rewirable(&self) -> bool {
		self.rewirable
	}

	pub fn wiring(&self) -> String {
		self.wiring.iter().map(|&i| self.alphabet.symbol(i)).collect()
	}

	pub fn reflect(&self, c: char) -> Result<char> {
		let n = self.alphabet.len();
		let o = self.offset as isize;
		let i = wrap(self.alphabet.index(c)? as isize + o, n);
		Ok(self.alphabet.symbol(wrap(self.wiring[i] as isize - o, n)))
	}

	fn require_rotatable(&self) -> Result<()> {
		if self.rotatable {
			Ok(())
		} else {
			let msg = format!("reflector {} cannot be rotated", self.label);
			Err(EnigmaError::invalid_operation(msg))
		}
	}

	/// Current position, 1-based.
	pub fn offset(&self) -> Result<usize> {
		self.require_rotatable()?;
		Ok(self.offset + 1)
	}

	pub fn set_offset(&mut self, pos: usize) -> Result<()> {
		self.require_rotatable()?;
		if !(1..=self.alphabet.len()).contains(&pos) {
			return Err(EnigmaError::invalid_argument(format!(
				"reflector position {} outside 1..={}",
				pos,
				self.alphabet.len()
			)));
		}
		self.offset = pos - 1;
		Ok(())
	}

	pub fn rotate(&mut self, k: isize) -> Result<()> {
		self.require_rotatable()?;
		self.offset = wrap(self.offset as isize + k, self.alphabet.len());
		Ok(())
	}

	pub fn position(&self, numeric: bool) -> Result<String> {
		self.require_rotatable()?;
		Ok(display_position(&self.alphabet, self.offset, numeric))
	}

	/// Current UKW-D pairs in German marking.
	pub fn pairs(&self) -> Result<Vec<String>> {
		self.require_rewirable()?;
		Ok(pairs_from_wiring(&self.wiring))
	}

	fn require_rewirable(&self) -> Result<()> {
		if self.rewirable {
			Ok(())
		} else {
			let msg = format!("reflector {} is not rewirable", self.label);
			Err(EnigmaError::invalid_operation(msg))
		}
	}

	/// Rewires a UKW-D. Leaves the wiring untouched on error.
	pub fn rewire<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
		self.require_rewirable()?;
		self.wiring = wiring_from_pairs(pairs)?;
		Ok(())
	}
}

fn mark_index(c: char) -> Option<usize> {
	if c == ' ' {
		return None;
	}
	MARKING.iter().position(|&m| m == c)
}

fn wiring_from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Vec<usize>> {
	if pairs.len() != REWIRABLE_PAIRS {
		return Err(EnigmaError::WrongPairCount {
			expected: REWIRABLE_PAIRS,
			actual: pairs.len(),
		});
	}

	let mut table: Vec<Option<usize>> = vec![None; MARKING.len()];
	let (_, j) = HARDWIRED[0];
	let (_, y) = HARDWIRED[1];
	table[j] = Some(y);
	table[y] = Some(j);

	let mut seen: Vec<(char, char)> = Vec::with_capacity(REWIRABLE_PAIRS);
	for raw in pairs {
		let raw = raw.as_ref();
		let letters: Vec<char> = raw.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
		if letters.len() != 2 {
			return Err(EnigmaError::invalid_pair(raw, "a pair has exactly two letters"));
		}
		let (a, b) = (letters[0], letters[1]);

		if let Some(&(h, _)) = HARDWIRED.iter().find(|(h, _)| *h == a || *h == b) {
			return Err(EnigmaError::HardwiredLetter(h));
		}
		if a == b {
			return Err(EnigmaError::invalid_pair(raw, "a letter cannot be paired with itself"));
		}
		if seen.iter().any(|&p| p == (a, b) || p == (b, a)) {
			return Err(EnigmaError::DuplicatePair(raw.to_string()));
		}

		let (ma, mb) = match (mark_index(a), mark_index(b)) {
			(Some(ma), Some(mb)) => (ma, mb),
			_ => return Err(EnigmaError::invalid_pair(raw, "letters must be A-Z")),
		};
		for (c, m) in [(a, ma), (b, mb)] {
			if table[m].is_some() {
				return Err(EnigmaError::DuplicateLetter(c));
			}
		}

		table[ma] = Some(mb);
		table[mb] = Some(ma);
		seen.push((a, b));
	}

	// 12 distinct pairs over 24 letters plus the fixed pair fill every slot
	Ok(table.into_iter().map(|t| t.unwrap_or_default()).collect())
}

fn pairs_from_wiring(wiring: &[usize]) -> Vec<String> {
	let mut pairs: Vec<(char, char)> = Vec::with_capacity(REWIRABLE_PAIRS);
	for (i, &j) in wiring.iter().enumerate() {
		if HARDWIRED.iter().any(|&(_, h)| h == i) {
			continue;
		}
		let pair = (MARKING[i], MARKING[j]);
		if !pairs.iter().any(|&(a, b)| (b, a) == pair) {
			pairs.push(pair);
		}
	}
	pairs.into_iter().map(|(a, b)| format!("{}{}", a, b)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalogue::DEFAULT_UKW_D_PAIRS;

	const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

	fn ukw_b() -> Reflector {
		Reflector::new("UKW-B", Alphabet::new(ALPHA), "YRUHQSLDPXNGOKMIEBFZCWVJAT", false)
	}

	fn ukw_d() -> Reflector {
		Reflector::rewirable("UKW-D", Alphabet::new(ALPHA), &DEFAULT_UKW_D_PAIRS).unwrap()
	}

	fn normalized(pairs: &[impl AsRef<str>]) -> Vec<String> {
		let mut out: Vec<String> = pairs
			.iter()
			.map(|p| {
				let mut c: Vec<char> = p.as_ref().chars().collect();
				c.sort_unstable();
				c.into_iter().collect()
			})
			.collect();
		out.sort();
		out
	}

	#[test]
	fn fixed_reflector_refuses_rotation() {
		let mut r = ukw_b();
		assert_eq!(r.reflect('A').unwrap(), 'Y');
		assert!(matches!(r.rotate(1), Err(EnigmaError::InvalidOperation(_))));
		assert!(matches!(r.set_offset(2), Err(EnigmaError::InvalidOperation(_))));
		assert!(matches!(r.position(false), Err(EnigmaError::InvalidOperation(_))));
		assert!(matches!(r.pairs(), Err(EnigmaError::InvalidOperation(_))));
	}

	#[test]
	fn rotatable_reflector_stays_involutive() {
		let mut r = Reflector::new("UKW", Alphabet::new(ALPHA), "IMETCGFRAYSQBZXWLHKDVUPOJN", true);
		for pos in 1..=26 {
			r.set_offset(pos).unwrap();
			for c in ALPHA.chars() {
				let out = r.reflect(c).unwrap();
				assert_ne!(out, c);
				assert_eq!(r.reflect(out).unwrap(), c);
			}
		}
		assert!(r.set_offset(27).is_err());
		r.set_offset(26).unwrap();
		r.rotate(1).unwrap();
		assert_eq!(r.offset().unwrap(), 1);
		assert_eq!(r.position(false).unwrap(), "A");
	}

	#[test]
	fn ukw_d_hard_wires_j_and_y() {
		let r = ukw_d();
		// contacts 0 and 13 carry the fixed pair
		assert_eq!(r.reflect('A').unwrap(), 'N');
		assert_eq!(r.reflect('N').unwrap(), 'A');
		for c in ALPHA.chars() {
			let out = r.reflect(c).unwrap();
			assert_ne!(out, c);
			assert_eq!(r.reflect(out).unwrap(), c);
		}
	}

	#[test]
	fn ukw_d_pairs_read_back() {
		let r = ukw_d();
		let pairs = r.pairs().unwrap();
		assert_eq!(pairs.len(), 12);
		assert_eq!(normalized(&pairs), normalized(&DEFAULT_UKW_D_PAIRS));
	}

	#[test]
	fn ukw_d_marking_maps_to_contacts() {
		let mut pairs = DEFAULT_UKW_D_PAIRS.to_vec();
		pairs[0] = "AV";
		let r = Reflector::rewirable("UKW-D", Alphabet::new(ALPHA), &pairs).unwrap();
		// A is marked at contact 25 (Z), V at contact 4 (E)
		assert_eq!(r.reflect('Z').unwrap(), 'E');
	}

	#[test]
	fn ukw_d_rejects_bad_wiring() {
		let mut r = ukw_d();
		let before = r.wiring();

		let short = &DEFAULT_UKW_D_PAIRS[..11];
		assert!(matches!(r.rewire(short), Err(EnigmaError::WrongPairCount { .. })));

		let mut pairs = DEFAULT_UKW_D_PAIRS.to_vec();
		pairs[0] = "JV";
		assert!(matches!(r.rewire(&pairs), Err(EnigmaError::HardwiredLetter('J'))));

		pairs[0] = "VA";
		pairs[1] = "AV";
		assert!(matches!(r.rewire(&pairs), Err(EnigmaError::DuplicatePair(_))));

		pairs[1] = "AB";
		assert!(matches!(r.rewire(&pairs), Err(EnigmaError::DuplicateLetter('A'))));

		pairs[1] = "B";
		assert!(matches!(r.rewire(&pairs), Err(EnigmaError::InvalidPair { .. })));

		assert_eq!(r.wiring(), before);
	}
}
