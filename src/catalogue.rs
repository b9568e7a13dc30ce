//! Model catalogue: wirings, turnovers and machine properties of every
//! supported Enigma variant. The single source of truth for component
//! construction.

use std::fmt;
use std::str::FromStr;

use crate::error::{EnigmaError, Result};
use crate::reflector::Reflector;
use crate::rotor::Rotor;
use crate::stator::Stator;
use crate::wiring::Alphabet;

const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const QWERTZ: &str = "QWERTZUIOASDFGHJKPYXCVBNML";
const DIGITS: &str = "1234567890";

const GERMAN_KEYS: [&str; 3] = ["QWERTZUIO", "ASDFGHJK", "PYXCVBNML"];
const DIGIT_KEYS: [&str; 3] = ["1234567890", "", ""];

/// Label of the field-rewirable reflector.
pub const UKW_D: &str = "UKW-D";

/// Wiring a freshly issued UKW-D carries, in German contact marking.
pub const DEFAULT_UKW_D_PAIRS: [&str; 12] = [
	"AV", "BO", "CT", "DM", "EZ", "FN", "GX", "HQ", "IS", "KR", "LU", "PW",
];

#[derive(Debug)]
pub struct RotorSpec {
	pub label: &'static str,
	pub wiring: &'static str,
	/// Positions at which the rotor to the left is carried.
	pub turnover: &'static str,
}

#[derive(Debug)]
pub struct ReflectorSpec {
	pub label: &'static str,
	/// Empty for the rewirable reflector, which is wired from pairs.
	pub wiring: &'static str,
	pub rewirable: bool,
}

#[derive(Debug)]
pub struct ModelSpec {
	pub label: &'static str,
	pub charset: &'static str,
	/// Letters per output group.
	pub group_size: usize,
	pub stator: &'static str,
	pub rotors: &'static [RotorSpec],
	pub reflectors: &'static [ReflectorSpec],
	pub rotor_count: usize,
	pub plugboard: bool,
	pub reflector_rotatable: bool,
	pub numeric_display: bool,
	keyboard: [&'static str; 3],
}

impl ModelSpec {
	pub fn alphabet(&self) -> Alphabet {
		Alphabet::new(self.charset)
	}

	/// Keyboard rows as indices into the charset, for front ends.
	pub fn layout(&self) -> [Vec<usize>; 3] {
		let row = |keys: &str| -> Vec<usize> {
			keys.chars()
				.filter_map(|c| self.charset.chars().position(|s| s == c))
				.collect()
		};
		[row(self.keyboard[0]), row(self.keyboard[1]), row(self.keyboard[2])]
	}

	pub fn rotor(&self, label: &str) -> Result<&'static RotorSpec> {
		self.rotors
			.iter()
			.find(|r| r.label == label)
			.ok_or_else(|| self.unknown(ComponentKind::Rotor, label))
	}

	pub fn reflector(&self, label: &str) -> Result<&'static ReflectorSpec> {
		self.reflectors
			.iter()
			.find(|r| r.label == label)
			.ok_or_else(|| self.unknown(ComponentKind::Reflector, label))
	}

	fn unknown(&self, kind: ComponentKind, label: &str) -> EnigmaError {
		EnigmaError::UnknownLabel {
			model: self.label.to_string(),
			kind,
			label: label.to_string(),
		}
	}
}

macro_rules! rotor {
	($label:expr, $wiring:expr, $turnover:expr) => {
		RotorSpec {
			label: $label,
			wiring: $wiring,
			turnover: $turnover,
		}
	};
}

macro_rules! reflector {
	($label:expr, $wiring:expr) => {
		ReflectorSpec {
			label: $label,
			wiring: $wiring,
			rewirable: false,
		}
	};
	($label:expr) => {
		ReflectorSpec {
			label: $label,
			wiring: "",
			rewirable: true,
		}
	};
}

static ENIGMA_I_ROTORS: [RotorSpec; 5] = [
	rotor!("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
	rotor!("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
	rotor!("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
	rotor!("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
	rotor!("V", "VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
];

static NAVY_ROTORS: [RotorSpec; 8] = [
	rotor!("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
	rotor!("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
	rotor!("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
	rotor!("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
	rotor!("V", "VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
	rotor!("VI", "JPGVOUMFYQBENHZRDKASXLICTW", "ZM"),
	rotor!("VII", "NZJHGRCXMYSWBOUFAIVLPEKQDT", "ZM"),
	rotor!("VIII", "FKQHTLXOCBJSPDZRAMEWNIUYGV", "ZM"),
];

static M4_ROTORS: [RotorSpec; 10] = [
	rotor!("Beta", "LEYJVCNIXWPBQMDRTAKZGFUHOS", ""),
	rotor!("Gamma", "FSOKANUERHMBTIYCWLQPZXVGJD", ""),
	rotor!("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
	rotor!("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
	rotor!("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
	rotor!("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
	rotor!("V", "VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
	rotor!("VI", "JPGVOUMFYQBENHZRDKASXLICTW", "ZM"),
	rotor!("VII", "NZJHGRCXMYSWBOUFAIVLPEKQDT", "ZM"),
	rotor!("VIII", "FKQHTLXOCBJSPDZRAMEWNIUYGV", "ZM"),
];

static NORWAY_ROTORS: [RotorSpec; 5] = [
	rotor!("I", "WTOKASUYVRBXJHQCEDFNGZMLIP", "Q"),
	rotor!("II", "GJLPUBSWEMCTQVHXAOFZDRKYNI", "E"),
	rotor!("III", "JWFMHNBPUSDYTIXVZGRQLAOEKC", "V"),
	rotor!("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
	rotor!("V", "HEJXQOTZBVFDASCILWPGYNMURK", "Z"),
];

static COMMERCIAL_ROTORS: [RotorSpec; 3] = [
	rotor!("I", "LPGSZMHAEOQKVXRFYBUTNICJDW", "Y"),
	rotor!("II", "SLVGBTFXJQOHEWIRZYAMKPCNDU", "E"),
	rotor!("III", "CJGDPSHKTURAWZXFMYNQOBVLIE", "N"),
];

static SWISS_K_ROTORS: [RotorSpec; 3] = [
	rotor!("I", "PEZUOHXSCVFMTBGLRINQJWAYDK", "Y"),
	rotor!("II", "ZOUESYDKFWPCIQXHMVBLGNJRAT", "E"),
	rotor!("III", "EHRVXGAOBQUSIMZFLYNWKTPDJC", "N"),
];

static RAILWAY_ROTORS: [RotorSpec; 3] = [
	rotor!("I", "JGDQOXUSCAMIFRVTPNEWKBLZYH", "N"),
	rotor!("II", "NTZPSFBOKMWRCJDIVLAEYUXHGQ", "E"),
	rotor!("III", "JVIUBHTCDYAKEQZPOSGXNRMWFL", "Y"),
];

static TIRPITZ_ROTORS: [RotorSpec; 8] = [
	rotor!("I", "KPTYUELOCVGRFQDANJMBSWHZXI", "WZEKQ"),
	rotor!("II", "UPHZLWEQMTDJXCAKSOIGVBYFNR", "WZFLR"),
	rotor!("III", "QUDLYRFEKONVZAXWHMGPJBSICT", "WZEKQ"),
	rotor!("IV", "CIWTBKXNRESPFLYDAGVHQUOJZM", "WZFLR"),
	rotor!("V", "UAXGISNJBVERDYLFZWTPCKOHMQ", "YCFKR"),
	rotor!("VI", "XFUZGALVHCNYSEWQTDMRBKPIOJ", "XEIMQ"),
	rotor!("VII", "BJVFTXPLNAYOZIKWGDQERUCHSM", "YCFKR"),
	rotor!("VIII", "YMTPNZHWKODAJXELUQVGCBISFR", "XEIMQ"),
];

static NUMERIC_ROTORS: [RotorSpec; 4] = [
	rotor!("I", "6418270359", "9"),
	rotor!("II", "5841097632", "9"),
	rotor!("III", "3581620794", "9"),
	rotor!("IV", "7394612805", "9"),
];

static ENIGMA_I_REFLECTORS: [ReflectorSpec; 4] = [
	reflector!("UKW-A", "EJMZALYXVBWFCRQUONTSPIKHGD"),
	reflector!("UKW-B", "YRUHQSLDPXNGOKMIEBFZCWVJAT"),
	reflector!("UKW-C", "FVPJIAOYEDRZXWGCTKUQSBNMHL"),
	reflector!(UKW_D),
];

static M3_REFLECTORS: [ReflectorSpec; 2] = [
	reflector!("UKW-B", "YRUHQSLDPXNGOKMIEBFZCWVJAT"),
	reflector!("UKW-C", "FVPJIAOYEDRZXWGCTKUQSBNMHL"),
];

static M4_REFLECTORS: [ReflectorSpec; 3] = [
	reflector!("UKW-b", "ENKQAUYWJICOPBLMDXZVFTHRGS"),
	reflector!("UKW-c", "RDOBJNTKVEHMLFCWZAXGYIPSUQ"),
	reflector!(UKW_D),
];

static NORWAY_REFLECTORS: [ReflectorSpec; 1] = [reflector!("UKW", "MOWJYPUXNDSRAIBFVLKZGQCHET")];
static COMMERCIAL_REFLECTORS: [ReflectorSpec; 1] =
	[reflector!("UKW", "IMETCGFRAYSQBZXWLHKDVUPOJN")];
static RAILWAY_REFLECTORS: [ReflectorSpec; 1] = [reflector!("UKW", "QYHOGNECVPUZTFDJAXWMKISRBL")];
static TIRPITZ_REFLECTORS: [ReflectorSpec; 1] = [reflector!("UKW", "GEKPBTAUMOCNILJDXZYFHWVQSR")];
static NUMERIC_REFLECTORS: [ReflectorSpec; 1] = [reflector!("UKW", "5079183642")];

static MODELS: [ModelSpec; 10] = [
	ModelSpec {
		label: "Enigma I",
		charset: ALPHA,
		group_size: 5,
		stator: ALPHA,
		rotors: &ENIGMA_I_ROTORS,
		reflectors: &ENIGMA_I_REFLECTORS,
		rotor_count: 3,
		plugboard: true,
		reflector_rotatable: false,
		numeric_display: true,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Norway Enigma",
		charset: ALPHA,
		group_size: 5,
		stator: ALPHA,
		rotors: &NORWAY_ROTORS,
		reflectors: &NORWAY_REFLECTORS,
		rotor_count: 3,
		plugboard: true,
		reflector_rotatable: false,
		numeric_display: true,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Enigma M3",
		charset: ALPHA,
		group_size: 4,
		stator: ALPHA,
		rotors: &NAVY_ROTORS,
		reflectors: &M3_REFLECTORS,
		rotor_count: 3,
		plugboard: true,
		reflector_rotatable: false,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Enigma M4",
		charset: ALPHA,
		group_size: 4,
		stator: ALPHA,
		rotors: &M4_ROTORS,
		reflectors: &M4_REFLECTORS,
		rotor_count: 4,
		plugboard: true,
		reflector_rotatable: false,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Enigma D",
		charset: ALPHA,
		group_size: 5,
		stator: QWERTZ,
		rotors: &COMMERCIAL_ROTORS,
		reflectors: &COMMERCIAL_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Enigma K",
		charset: ALPHA,
		group_size: 5,
		stator: QWERTZ,
		rotors: &COMMERCIAL_ROTORS,
		reflectors: &COMMERCIAL_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Swiss K",
		charset: ALPHA,
		group_size: 5,
		stator: QWERTZ,
		rotors: &SWISS_K_ROTORS,
		reflectors: &COMMERCIAL_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Railway Enigma",
		charset: ALPHA,
		group_size: 5,
		stator: QWERTZ,
		rotors: &RAILWAY_ROTORS,
		reflectors: &RAILWAY_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Tirpitz Enigma",
		charset: ALPHA,
		group_size: 5,
		stator: "KZROUQHYAIGBLWVSTDXFPNMCJE",
		rotors: &TIRPITZ_ROTORS,
		reflectors: &TIRPITZ_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: GERMAN_KEYS,
	},
	ModelSpec {
		label: "Enigma Z",
		charset: DIGITS,
		group_size: 5,
		stator: DIGITS,
		rotors: &NUMERIC_ROTORS,
		reflectors: &NUMERIC_REFLECTORS,
		rotor_count: 3,
		plugboard: false,
		reflector_rotatable: true,
		numeric_display: false,
		keyboard: DIGIT_KEYS,
	},
];

pub fn models() -> &'static [ModelSpec] {
	&MODELS
}

pub fn model(label: &str) -> Result<&'static ModelSpec> {
	MODELS
		.iter()
		.find(|m| m.label == label)
		.ok_or_else(|| EnigmaError::UnknownModel(label.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
	pub rotors: Vec<&'static str>,
	pub reflectors: Vec<&'static str>,
}

pub fn labels(model_label: &str) -> Result<Labels> {
	let spec = model(model_label)?;
	Ok(Labels {
		rotors: spec.rotors.iter().map(|r| r.label).collect(),
		reflectors: spec.reflectors.iter().map(|r| r.label).collect(),
	})
}

/// Reflector and rotor labels a freshly built machine starts with.
pub fn default_configuration(
	model_label: &str,
	rotor_count: usize,
) -> Result<(&'static str, Vec<&'static str>)> {
	let spec = model(model_label)?;
	if rotor_count == 0 {
		return Err(EnigmaError::invalid_argument("a machine needs at least one rotor"));
	}

	if spec.label == "Enigma M4" && rotor_count == 4 {
		return Ok(("UKW-b", vec!["Beta", "I", "II", "III"]));
	}

	let rotors = spec.rotors.iter().map(|r| r.label).cycle().take(rotor_count).collect();
	Ok((spec.reflectors[0].label, rotors))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
	Rotor,
	Reflector,
	Stator,
}

impl fmt::Display for ComponentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ComponentKind::Rotor => "rotor",
			ComponentKind::Reflector => "reflector",
			ComponentKind::Stator => "stator",
		})
	}
}

impl FromStr for ComponentKind {
	type Err = EnigmaError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"rotor" => Ok(ComponentKind::Rotor),
			"reflector" => Ok(ComponentKind::Reflector),
			"stator" => Ok(ComponentKind::Stator),
			_ => Err(EnigmaError::invalid_argument(format!("unknown component kind `{}`", s))),
		}
	}
}

#[derive(Debug, Clone)]
pub enum Component {
	Rotor(Rotor),
	Reflector(Reflector),
	Stator(Stator),
}

pub fn build_rotor(spec: &ModelSpec, label: &str) -> Result<Rotor> {
	let r = spec.rotor(label)?;
	Ok(Rotor::new(r.label, spec.alphabet(), r.wiring, r.turnover))
}

pub fn build_reflector(spec: &ModelSpec, label: &str) -> Result<Reflector> {
	let r = spec.reflector(label)?;
	if r.rewirable {
		Reflector::rewirable(r.label, spec.alphabet(), &DEFAULT_UKW_D_PAIRS)
	} else {
		Ok(Reflector::new(r.label, spec.alphabet(), r.wiring, spec.reflector_rotatable))
	}
}

pub fn build_stator(spec: &ModelSpec) -> Stator {
	Stator::new("ETW", spec.alphabet(), spec.stator)
}

/// Builds any component of `model_label` by kind. The stator ignores `label`
/// unless it is given, in which case it must be `ETW`.
pub fn build_component(model_label: &str, kind: ComponentKind, label: &str) -> Result<Component> {
	let spec = model(model_label)?;
	match kind {
		ComponentKind::Rotor => build_rotor(spec, label).map(Component::Rotor),
		ComponentKind::Reflector => build_reflector(spec, label).map(Component::Reflector),
		ComponentKind::Stator if label.is_empty() || label == "ETW" => {
			Ok(Component::Stator(build_stator(spec)))
		}
		ComponentKind::Stator => Err(spec.unknown(ComponentKind::Stator, label)),
	}
}
