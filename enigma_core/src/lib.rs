//! Generalized rotor-cipher engine over a user-defined alphabet.
//!
//! A machine is a plugboard of disjoint symbol cycles, an ordered stack of
//! stepping rotors and a reflector. Every processed symbol advances the
//! machine, so two machines built from the same configuration invert each
//! other when the reflector is an involution.
//!
//! This is a toy cipher and must **not** be used to protect real data.

pub mod alphabet;
pub mod config;
pub mod error;
pub mod keygen;
pub mod machine;
pub mod plugboard;
pub mod reflector;
pub mod rotor;
pub mod stepping;
pub mod validation;

pub use crate::alphabet::Alphabet;
pub use crate::config::{ConfigError, Configuration};
pub use crate::error::{ConfigurationError, EnigmaError, ErrorKind, ValidationError};
pub use crate::keygen::{KeygenOptions, generate_configuration, generate_configuration_os};
pub use crate::machine::{EnigmaMachine, MachineState};
pub use crate::plugboard::{Direction, PlugCycle, Plugboard};
pub use crate::reflector::{IdentityReflector, MirrorReflector, Reflector, ReflectorKind};
pub use crate::rotor::Rotor;
pub use crate::stepping::{ClassicStepping, FactorStepping, SteppingRule};
pub use crate::validation::{plug_test, pretest, rotor_test, validate};
