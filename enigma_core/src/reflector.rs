use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ValidationError};

/// Midpoint transformation between the forward and backward rotor passes.
///
/// Implementations must be a bijection on `[0, N)`; the machine checks this
/// once at construction. Decoding with a second machine only inverts the
/// cipher when the reflector is also an involution.
pub trait Reflector: Debug + Send + Sync {
    fn reflect(&self, index: usize) -> usize;
}

/// Leaves the index untouched. This is the default placeholder reflector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityReflector;

impl Reflector for IdentityReflector {
    fn reflect(&self, index: usize) -> usize {
        index
    }
}

/// Maps `i` to `N - 1 - i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorReflector {
    size: usize,
}

impl MirrorReflector {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Reflector for MirrorReflector {
    fn reflect(&self, index: usize) -> usize {
        self.size - 1 - index
    }
}

/// Built-in reflector selection as it appears in a configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectorKind {
    #[default]
    Identity,
    Mirror,
}

impl ReflectorKind {
    pub fn build(self, size: usize) -> Box<dyn Reflector> {
        match self {
            ReflectorKind::Identity => Box::new(IdentityReflector),
            ReflectorKind::Mirror => Box::new(MirrorReflector::new(size)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReflectorKind::Identity => "identity",
            ReflectorKind::Mirror => "mirror",
        }
    }
}

impl FromStr for ReflectorKind {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(ReflectorKind::Identity),
            "mirror" => Ok(ReflectorKind::Mirror),
            _ => Err(ConfigurationError::UnknownReflector {
                name: value.to_string(),
            }),
        }
    }
}

/// Checks that `reflector` permutes `[0, size)`.
pub fn check_reflector(reflector: &dyn Reflector, size: usize) -> Result<(), ValidationError> {
    let mut seen = vec![false; size];
    for index in 0..size {
        let image = reflector.reflect(index);
        if image >= size || seen[image] {
            return Err(ValidationError::ReflectorNotBijective { index, image });
        }
        seen[image] = true;
    }
    Ok(())
}
