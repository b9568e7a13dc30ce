//! Simulator of the Enigma family of rotor cipher machines: army and navy
//! three- and four-rotor models, commercial models with a settable
//! reflector, the rewirable UKW-D, the Uhr plugboard accessory and the
//! numeric Enigma Z.
//!
//! ```
//! use enigma::wiring::parse_positions;
//! use enigma::Enigma;
//!
//! let mut machine = Enigma::new("Enigma I").unwrap();
//! machine.set_rotors(&["II", "I", "III"]).unwrap();
//! machine.set_positions(&parse_positions("ABL", 3).unwrap()).unwrap();
//! machine.set_checkpoint();
//! let cipher = machine.encrypt("HELLO").unwrap();
//!
//! machine.load_checkpoint().unwrap();
//! assert_eq!(machine.encrypt(&cipher).unwrap(), "HELLO");
//! ```

pub mod buffer;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod machine;
pub mod plugboard;
pub mod reflector;
pub mod rotor;
pub mod session;
pub mod stator;
pub mod uhr;
pub mod wiring;

pub use config::{MachineConfig, PositionValue};
pub use error::{ConfigError, EnigmaError, Result};
pub use machine::Machine;
pub use session::{Enigma, UhrAction};
pub use wiring::Position;
