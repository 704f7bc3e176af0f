use thiserror::Error;

/// Structural problems with a configuration: counts, ordering and scalar fields.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("number_of_rotors is {declared} but {supplied} rotor wirings were supplied")]
    RotorCountMismatch { declared: usize, supplied: usize },

    #[error("rotor sequence lists {listed} rotors but {supplied} rotor wirings were supplied")]
    SequenceLengthMismatch { listed: usize, supplied: usize },

    #[error("rotor sequence names unknown rotor '{name}'")]
    UnknownRotor { name: String },

    #[error("rotor '{name}' appears more than once in the rotor sequence")]
    DuplicateRotor { name: String },

    #[error("iteration seed must be non-negative, found {found}")]
    NegativeIteration { found: i64 },

    #[error("rotation factor must be a non-negative integer, found {found}")]
    InvalidRotationFactor { found: i64 },

    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("unknown reflector '{name}'")]
    UnknownReflector { name: String },
}

/// Combinatorial soundness problems: wirings that are not permutations,
/// plugboard cycles that overlap or leave the alphabet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rotor '{rotor}' wiring has {found} entries, expected {expected}")]
    WiringLength {
        rotor: String,
        expected: usize,
        found: usize,
    },

    #[error("rotor '{rotor}' wiring value {value} is outside [0, {size})")]
    WiringOutOfRange {
        rotor: String,
        value: i64,
        size: usize,
    },

    #[error("rotor '{rotor}' wiring repeats value {value}")]
    WiringRepeat { rotor: String, value: i64 },

    #[error("alphabet contains duplicate symbol {symbol:?}")]
    DuplicateSymbol { symbol: char },

    #[error("plugboard cycle {cycle} repeats symbol {symbol:?}")]
    CycleRepeat { cycle: usize, symbol: char },

    #[error("plugboard cycle {cycle} shares symbol {symbol:?} with cycle {other}")]
    CycleOverlap {
        cycle: usize,
        other: usize,
        symbol: char,
    },

    #[error("plugboard cycle {cycle} uses symbol {symbol:?} outside the alphabet")]
    CycleSymbolOutsideAlphabet { cycle: usize, symbol: char },

    #[error("reflector is not a bijection: index {index} maps to {image}")]
    ReflectorNotBijective { index: usize, image: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    InvalidCharacter,
    IterationOverflow,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EnigmaError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("symbol {symbol:?} is not part of the alphabet")]
    InvalidCharacter { symbol: char },

    #[error("iteration counter overflowed")]
    IterationOverflow,
}

impl EnigmaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnigmaError::Configuration(_) => ErrorKind::Configuration,
            EnigmaError::Validation(_) => ErrorKind::Validation,
            EnigmaError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            EnigmaError::IterationOverflow => ErrorKind::IterationOverflow,
        }
    }
}
