//! Machine configuration and its JSON loaders.
//!
//! Two layouts are accepted. The native layout serializes [`Configuration`]
//! directly. The legacy key-file layout keeps the machine settings under a
//! `"setting"` object, the alphabet under `"characters"`, and each rotor
//! wiring as a top-level array keyed by its name:
//!
//! ```json
//! {
//!     "setting": {
//!         "number_of_rotor": 2,
//!         "sequence_of_rotor": "r2>r1",
//!         "iteration": 0,
//!         "n": 0,
//!         "plugs": ["AB"]
//!     },
//!     "characters": ["A", "B", "C", "D"],
//!     "r1": [1, 0, 3, 2],
//!     "r2": [3, 2, 1, 0]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{ConfigurationError, EnigmaError};
use crate::reflector::ReflectorKind;

const LEGACY_SEQUENCE_SEPARATOR: char = '>';

/// Logical machine configuration. Validate with
/// [`validate`](crate::validation::validate) or by building an
/// [`EnigmaMachine`](crate::machine::EnigmaMachine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub alphabet: Vec<char>,
    pub number_of_rotors: usize,
    pub rotor_wirings: BTreeMap<String, Vec<i64>>,
    pub rotor_sequence: Vec<String>,
    #[serde(default)]
    pub iteration: i64,
    #[serde(default)]
    pub rotation_factor: i64,
    #[serde(default)]
    pub plugboard_cycles: Vec<String>,
    #[serde(default)]
    pub reflector: ReflectorKind,
}

impl Configuration {
    /// Hex BLAKE3 digest over every field, in a fixed order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(b"enigma::configuration");
        hash_len(&mut hasher, self.alphabet.len());
        for symbol in &self.alphabet {
            hasher.update(&u32::from(*symbol).to_le_bytes());
        }
        hash_len(&mut hasher, self.number_of_rotors);
        hash_len(&mut hasher, self.rotor_wirings.len());
        for (name, wiring) in &self.rotor_wirings {
            hash_str(&mut hasher, name);
            hash_len(&mut hasher, wiring.len());
            for value in wiring {
                hasher.update(&value.to_le_bytes());
            }
        }
        hash_len(&mut hasher, self.rotor_sequence.len());
        for name in &self.rotor_sequence {
            hash_str(&mut hasher, name);
        }
        hasher.update(&self.iteration.to_le_bytes());
        hasher.update(&self.rotation_factor.to_le_bytes());
        hash_len(&mut hasher, self.plugboard_cycles.len());
        for cycle in &self.plugboard_cycles {
            hash_str(&mut hasher, cycle);
        }
        hash_str(&mut hasher, self.reflector.as_str());
        hex::encode(hasher.finalize().as_bytes())
    }
}

fn hash_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn hash_str(hasher: &mut Hasher, text: &str) {
    hash_len(hasher, text.len());
    hasher.update(text.as_bytes());
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Enigma(#[from] EnigmaError),
}

impl From<ConfigurationError> for ConfigError {
    fn from(value: ConfigurationError) -> Self {
        Self::Enigma(value.into())
    }
}

#[derive(Debug, Deserialize)]
struct LegacySetting {
    #[serde(alias = "number_of_rotors")]
    number_of_rotor: Option<usize>,
    sequence_of_rotor: Option<String>,
    iteration: Option<i64>,
    n: Option<i64>,
    #[serde(default)]
    plugs: Vec<String>,
    reflector: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyKeyFile {
    setting: LegacySetting,
    characters: Option<Vec<char>>,
    #[serde(flatten)]
    rotors: BTreeMap<String, Value>,
}

impl LegacyKeyFile {
    fn into_configuration(self) -> Result<Configuration, ConfigError> {
        let setting = self.setting;
        let alphabet = self.characters.ok_or(ConfigurationError::MissingField {
            field: "characters",
        })?;
        let number_of_rotors = setting.number_of_rotor.ok_or(ConfigurationError::MissingField {
            field: "number_of_rotor",
        })?;
        let sequence = setting
            .sequence_of_rotor
            .ok_or(ConfigurationError::MissingField {
                field: "sequence_of_rotor",
            })?;
        let rotor_sequence: Vec<String> = sequence
            .split(LEGACY_SEQUENCE_SEPARATOR)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        // Spare rotors in the file are ignored; only those in the sequence are wired.
        let mut rotor_wirings = BTreeMap::new();
        for name in &rotor_sequence {
            let value = self
                .rotors
                .get(name)
                .ok_or_else(|| ConfigurationError::UnknownRotor { name: name.clone() })?;
            let wiring: Vec<i64> = serde_json::from_value(value.clone())?;
            rotor_wirings.insert(name.clone(), wiring);
        }

        let reflector = match setting.reflector {
            Some(name) => name.parse()?,
            None => ReflectorKind::default(),
        };

        Ok(Configuration {
            alphabet,
            number_of_rotors,
            rotor_wirings,
            rotor_sequence,
            iteration: setting.iteration.unwrap_or(0),
            rotation_factor: setting.n.unwrap_or(0),
            plugboard_cycles: setting.plugs,
            reflector,
        })
    }
}

/// Parses either configuration layout. The result is not yet validated.
pub fn from_json_str(text: &str) -> Result<Configuration, ConfigError> {
    let value: Value = serde_json::from_str(text)?;
    from_json_value(value)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Configuration, ConfigError> {
    let value: Value = serde_json::from_reader(reader)?;
    from_json_value(value)
}

pub fn from_json_value(value: Value) -> Result<Configuration, ConfigError> {
    if value.get("setting").is_some() {
        debug!("parsing legacy key-file layout");
        let legacy: LegacyKeyFile = serde_json::from_value(value)?;
        legacy.into_configuration()
    } else {
        debug!("parsing native configuration layout");
        Ok(serde_json::from_value(value)?)
    }
}

pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    let text = fs::read_to_string(path)?;
    from_json_str(&text)
}

/// Writes `config` in the native layout.
pub fn save(path: &Path, config: &Configuration) -> Result<(), ConfigError> {
    let serialized = serde_json::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}
