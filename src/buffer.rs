use std::collections::VecDeque;

use crate::error::{EnigmaError, Result};

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded record of serialized rotor positions, oldest first.
#[derive(Debug, Clone)]
pub struct PositionBuffer {
	entries: VecDeque<u64>,
	capacity: usize,
}

impl Default for PositionBuffer {
	fn default() -> Self {
		PositionBuffer {
			entries: VecDeque::new(),
			capacity: DEFAULT_CAPACITY,
		}
	}
}

impl PositionBuffer {
	pub fn new(capacity: usize) -> Result<Self> {
		if capacity == 0 {
			return Err(EnigmaError::invalid_argument("position buffer capacity must be positive"));
		}
		Ok(PositionBuffer {
			entries: VecDeque::new(),
			capacity,
		})
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn last(&self) -> Option<u64> {
		self.entries.back().copied()
	}

	pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
		self.entries.iter().copied()
	}

	/// Appends, evicting the oldest entry when full.
	pub fn push(&mut self, position: u64) {
		if self.entries.len() == self.capacity {
			self.entries.pop_front();
		}
		self.entries.push_back(position);
	}

	/// Drops the newest `k` entries and returns the new newest one.
	pub fn truncate_last(&mut self, k: usize) -> Option<u64> {
		let keep = self.entries.len().saturating_sub(k);
		self.entries.truncate(keep);
		self.last()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn evicts_oldest_on_overflow() {
		let mut b = PositionBuffer::new(3).unwrap();
		for p in 1..=5 {
			b.push(p);
		}
		assert_eq!(b.len(), 3);
		assert_eq!(b.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
	}

	#[test]
	fn truncates_from_the_newest_end() {
		let mut b = PositionBuffer::default();
		assert_eq!(b.capacity(), DEFAULT_CAPACITY);
		for p in 10..15 {
			b.push(p);
		}
		assert_eq!(b.truncate_last(2), Some(12));
		assert_eq!(b.truncate_last(10), None);
		assert!(b.is_empty());
	}

	#[test]
	fn zero_capacity_is_rejected() {
		assert!(PositionBuffer::new(0).is_err());
	}
}
