use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use enigma::catalogue;
use enigma::wiring::{parse_positions, Position};
use enigma::{Enigma, MachineConfig, UhrAction};

const DEFAULT_MODEL: &str = "Enigma I";

#[derive(Parser, Debug)]
#[command(name = "enigma", version, about = "Enigma rotor cipher machine simulator")]
struct Cli {
	/// Machine model, e.g. "Enigma I", "Enigma M4" (see --list).
	#[arg(long)]
	model: Option<String>,

	/// Reflector label.
	#[arg(long)]
	reflector: Option<String>,

	/// Rotor labels, left to right.
	#[arg(long, num_args = 1.., value_name = "LABEL")]
	rotors: Vec<String>,

	/// Rotor positions, as letters (ABL) or 1-based numbers (1 2 12).
	#[arg(long, num_args = 1.., value_name = "POSITION")]
	positions: Vec<String>,

	/// Ring settings, as letters or 1-based numbers.
	#[arg(long, num_args = 1.., value_name = "POSITION")]
	rings: Vec<String>,

	/// Plugboard pairs, or the Uhr's ten pairs with --uhr.
	#[arg(long, num_args = 1.., value_name = "PAIR")]
	plugs: Vec<String>,

	/// Position of a settable reflector.
	#[arg(long, value_name = "POSITION")]
	reflector_position: Option<String>,

	/// Twelve UKW-D pairs in German marking.
	#[arg(long, num_args = 1.., value_name = "PAIR")]
	reflector_pairs: Vec<String>,

	/// Connect the Uhr at this position (0-39).
	#[arg(long, value_name = "POSITION")]
	uhr: Option<usize>,

	/// Load the machine settings from a configuration file.
	#[arg(
		long,
		value_name = "FILE",
		conflicts_with_all = [
			"model", "reflector", "rotors", "positions", "rings", "plugs",
			"reflector_position", "reflector_pairs", "uhr",
		]
	)]
	from: Option<PathBuf>,

	/// Write the starting settings to a configuration file.
	#[arg(long, value_name = "FILE")]
	save: Option<PathBuf>,

	/// Text to encipher. Read from one line of stdin when absent.
	#[arg(short, long)]
	message: Option<String>,

	/// List models and their rotors and reflectors.
	#[arg(long)]
	list: bool,

	/// Do not split the output into letter groups.
	#[arg(long)]
	raw: bool,

	/// Log more (repeat for more).
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

fn main() {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) if !e.use_stderr() => e.exit(),
		Err(e) => {
			let _ = e.print();
			std::process::exit(1);
		}
	};

	init_tracing(cli.verbose);

	if let Err(e) = run(&cli) {
		eprintln!("error: {:#}", e);
		std::process::exit(1);
	}
}

fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn run(cli: &Cli) -> Result<()> {
	if cli.list {
		list_models();
		return Ok(());
	}

	let mut machine = build_machine(cli)?;
	if let Some(path) = &cli.save {
		machine
			.save_config_file(path)
			.with_context(|| format!("saving configuration to {}", path.display()))?;
	}

	let message = match &cli.message {
		Some(m) => m.clone(),
		None => read_line()?,
	};

	let alphabet = machine.machine().alphabet().clone();
	let text: String = message
		.chars()
		.map(|c| c.to_ascii_uppercase())
		.filter(|&c| alphabet.contains(c))
		.collect();
	let dropped = message.chars().count() - text.chars().count();
	debug!(kept = text.len(), dropped, "message filtered");

	let out = machine.encrypt(&text)?;
	if cli.raw {
		println!("{}", out);
	} else {
		println!("{}", group(&out, machine.machine().model().group_size));
	}
	Ok(())
}

fn build_machine(cli: &Cli) -> Result<Enigma> {
	if let Some(path) = &cli.from {
		let config = MachineConfig::load(path)
			.with_context(|| format!("loading {}", path.display()))?;
		return Enigma::from_config(&config).with_context(|| format!("applying {}", path.display()));
	}

	let model = cli.model.as_deref().unwrap_or(DEFAULT_MODEL);
	let mut machine = Enigma::new(model)?;

	if let Some(reflector) = &cli.reflector {
		machine.set_reflector(reflector)?;
	}
	if !cli.rotors.is_empty() {
		machine.set_rotors(&cli.rotors)?;
	}

	let count = machine.rotors().len();
	if !cli.rings.is_empty() {
		machine.set_ring_settings(&parse_positions(&cli.rings.join(" "), count)?)?;
	}
	if !cli.positions.is_empty() {
		machine.set_positions(&parse_positions(&cli.positions.join(" "), count)?)?;
	}
	if !cli.reflector_pairs.is_empty() {
		machine.set_reflector_pairs(&cli.reflector_pairs)?;
	}
	if let Some(pos) = &cli.reflector_position {
		machine.set_reflector_position(Position::parse(pos)?)?;
	}
	if let Some(pos) = cli.uhr {
		machine.uhr(UhrAction::Connect)?;
		machine.set_uhr_position(pos)?;
	}
	if !cli.plugs.is_empty() {
		machine.set_plug_pairs(&cli.plugs)?;
	}

	machine.set_checkpoint();
	Ok(machine)
}

fn read_line() -> Result<String> {
	let mut line = String::new();
	io::stdin().lock().read_line(&mut line).context("reading message from stdin")?;
	let line = line.trim().to_string();
	if line.is_empty() {
		bail!("no message given; use --message or pipe one line on stdin");
	}
	Ok(line)
}

fn list_models() {
	for m in catalogue::models() {
		let rotors: Vec<&str> = m.rotors.iter().map(|r| r.label).collect();
		let reflectors: Vec<&str> = m.reflectors.iter().map(|r| r.label).collect();
		println!("{}", m.label);
		println!("\trotors ({}):\t{}", m.rotor_count, rotors.join(" "));
		println!("\treflectors:\t{}", reflectors.join(" "));
	}
}

fn group(text: &str, size: usize) -> String {
	if size == 0 {
		return text.to_string();
	}
	let chars: Vec<char> = text.chars().collect();
	chars
		.chunks(size)
		.map(|c| c.iter().collect::<String>())
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn groups_output() {
		assert_eq!(group("ABCDEFGHIJKL", 5), "ABCDE FGHIJ KL");
		assert_eq!(group("ABCD", 4), "ABCD");
		assert_eq!(group("", 5), "");
	}

	#[test]
	fn from_conflicts_with_settings() {
		let args = ["enigma", "--from", "m.json", "--rotors", "I", "II", "III"];
		let err = Cli::try_parse_from(args).unwrap_err();
		assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
	}

	#[test]
	fn builds_from_flags() {
		let cli = Cli::try_parse_from([
			"enigma", "--model", "Enigma I", "--reflector", "UKW-A", "--rotors", "II", "I", "III", "--positions",
			"ABL", "--rings", "24", "13", "22", "--plugs", "AM", "FI", "NV", "PS", "TU", "WZ",
		])
		.unwrap();
		let mut machine = build_machine(&cli).unwrap();
		assert_eq!(machine.checkpoint(), 10212);
		assert_eq!(machine.encrypt("GCDSEAHUGW").unwrap(), "FEINDLIQEI");
	}
}
