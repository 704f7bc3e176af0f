//! Consistency checks run before a machine becomes usable.
//!
//! The `*_test` functions answer yes/no; the `check_*` forms report which
//! rotor or cycle is at fault. [`pretest`] composes all of them and is the
//! single gate [`EnigmaMachine`](crate::machine::EnigmaMachine) runs on
//! construction.

use std::collections::{HashMap, HashSet};

use crate::alphabet::Alphabet;
use crate::config::Configuration;
use crate::error::{ConfigurationError, EnigmaError, ValidationError};

/// True iff `wiring` is a permutation of `[0, n)`.
pub fn rotor_test(n: usize, wiring: &[i64]) -> bool {
    check_wiring("", n, wiring).is_ok()
}

/// Checks a rotor wiring and returns it as indices.
pub fn check_wiring(name: &str, n: usize, wiring: &[i64]) -> Result<Vec<usize>, ValidationError> {
    if wiring.len() != n {
        return Err(ValidationError::WiringLength {
            rotor: name.to_string(),
            expected: n,
            found: wiring.len(),
        });
    }
    let mut seen = vec![false; n];
    let mut indices = Vec::with_capacity(n);
    for &value in wiring {
        let index = usize::try_from(value)
            .ok()
            .filter(|&index| index < n)
            .ok_or_else(|| ValidationError::WiringOutOfRange {
                rotor: name.to_string(),
                value,
                size: n,
            })?;
        if seen[index] {
            return Err(ValidationError::WiringRepeat {
                rotor: name.to_string(),
                value,
            });
        }
        seen[index] = true;
        indices.push(index);
    }
    Ok(indices)
}

/// True iff the cycles are repetition-free, pairwise disjoint and drawn
/// from `alphabet`.
pub fn plug_test<S: AsRef<str>>(alphabet: &Alphabet, cycles: &[S]) -> bool {
    check_cycles(alphabet, cycles).is_ok()
}

pub fn check_cycles<S: AsRef<str>>(
    alphabet: &Alphabet,
    cycles: &[S],
) -> Result<(), ValidationError> {
    let mut owner: HashMap<char, usize> = HashMap::new();
    for (cycle, text) in cycles.iter().enumerate() {
        for symbol in text.as_ref().chars() {
            if !alphabet.contains(symbol) {
                return Err(ValidationError::CycleSymbolOutsideAlphabet { cycle, symbol });
            }
            if let Some(&other) = owner.get(&symbol) {
                return Err(if other == cycle {
                    ValidationError::CycleRepeat { cycle, symbol }
                } else {
                    ValidationError::CycleOverlap {
                        cycle,
                        other,
                        symbol,
                    }
                });
            }
            owner.insert(symbol, cycle);
        }
    }
    Ok(())
}

/// Validates a full configuration. Structural problems come back as
/// [`ConfigurationError`], soundness problems as [`ValidationError`].
pub fn pretest(config: &Configuration) -> Result<(), EnigmaError> {
    let supplied = config.rotor_wirings.len();
    if config.number_of_rotors != supplied {
        return Err(ConfigurationError::RotorCountMismatch {
            declared: config.number_of_rotors,
            supplied,
        }
        .into());
    }
    if config.rotor_sequence.len() != supplied {
        return Err(ConfigurationError::SequenceLengthMismatch {
            listed: config.rotor_sequence.len(),
            supplied,
        }
        .into());
    }
    let mut listed = HashSet::with_capacity(supplied);
    for name in &config.rotor_sequence {
        if !config.rotor_wirings.contains_key(name) {
            return Err(ConfigurationError::UnknownRotor { name: name.clone() }.into());
        }
        if !listed.insert(name.as_str()) {
            return Err(ConfigurationError::DuplicateRotor { name: name.clone() }.into());
        }
    }
    if config.iteration < 0 {
        return Err(ConfigurationError::NegativeIteration {
            found: config.iteration,
        }
        .into());
    }
    if config.rotation_factor < 0 {
        return Err(ConfigurationError::InvalidRotationFactor {
            found: config.rotation_factor,
        }
        .into());
    }

    let alphabet = Alphabet::new(&config.alphabet)?;
    for (name, wiring) in &config.rotor_wirings {
        check_wiring(name, alphabet.len(), wiring)?;
    }
    check_cycles(&alphabet, &config.plugboard_cycles)?;
    Ok(())
}

/// Pre-flight entry point for tooling; identical to [`pretest`].
pub fn validate(config: &Configuration) -> Result<(), EnigmaError> {
    pretest(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflector::ReflectorKind;
    use std::collections::BTreeMap;

    fn abcd_config() -> Configuration {
        let mut rotor_wirings = BTreeMap::new();
        rotor_wirings.insert("r1".to_string(), vec![1, 0, 3, 2]);
        rotor_wirings.insert("r2".to_string(), vec![3, 2, 1, 0]);
        Configuration {
            alphabet: "ABCD".chars().collect(),
            number_of_rotors: 2,
            rotor_wirings,
            rotor_sequence: vec!["r2".into(), "r1".into()],
            iteration: 0,
            rotation_factor: 0,
            plugboard_cycles: vec!["AB".into()],
            reflector: ReflectorKind::Identity,
        }
    }

    #[test]
    fn rotor_test_accepts_permutations_only() {
        assert!(rotor_test(4, &[1, 0, 3, 2]));
        assert!(rotor_test(1, &[0]));
        assert!(!rotor_test(4, &[1, 0, 3]));
        assert!(!rotor_test(4, &[1, 0, 3, 2, 4]));
        assert!(!rotor_test(4, &[1, 0, 3, 4]));
        assert!(!rotor_test(4, &[1, 0, 3, -1]));
        assert!(!rotor_test(4, &[1, 1, 3, 2]));
    }

    #[test]
    fn check_wiring_names_rotor() {
        let err = check_wiring("r7", 3, &[0, 2, 2]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WiringRepeat {
                rotor: "r7".into(),
                value: 2
            }
        );
        assert_eq!(check_wiring("r7", 3, &[2, 0, 1]).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn plug_test_disjointness() {
        let alphabet = Alphabet::new(&"ABCDEFGH".chars().collect::<Vec<_>>()).unwrap();
        assert!(plug_test(&alphabet, &["ABCD", "EFGH"]));
        assert!(!plug_test(&alphabet, &["ABCD", "DEFG"]));
        assert!(!plug_test(&alphabet, &["AABC"]));
        assert!(!plug_test(&alphabet, &["ABZ"]));
        assert!(plug_test::<&str>(&alphabet, &[]));
    }

    #[test]
    fn check_cycles_reports_cycle_index() {
        let alphabet = Alphabet::new(&"ABCDEFGH".chars().collect::<Vec<_>>()).unwrap();
        assert_eq!(
            check_cycles(&alphabet, &["ABCD", "DEFG"]).unwrap_err(),
            ValidationError::CycleOverlap {
                cycle: 1,
                other: 0,
                symbol: 'D'
            }
        );
        assert_eq!(
            check_cycles(&alphabet, &["AABC"]).unwrap_err(),
            ValidationError::CycleRepeat {
                cycle: 0,
                symbol: 'A'
            }
        );
    }

    #[test]
    fn pretest_accepts_sound_config() {
        assert!(pretest(&abcd_config()).is_ok());
        assert!(validate(&abcd_config()).is_ok());
    }

    #[test]
    fn pretest_structural_failures() {
        let mut config = abcd_config();
        config.number_of_rotors = 3;
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(
                ConfigurationError::RotorCountMismatch {
                    declared: 3,
                    supplied: 2
                }
            ))
        ));

        let mut config = abcd_config();
        config.rotor_sequence = vec!["r1".into(), "r1".into()];
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(ConfigurationError::DuplicateRotor { .. }))
        ));

        let mut config = abcd_config();
        config.rotor_sequence = vec!["r1".into()];
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(
                ConfigurationError::SequenceLengthMismatch { .. }
            ))
        ));

        let mut config = abcd_config();
        config.rotor_sequence = vec!["r1".into(), "r9".into()];
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(ConfigurationError::UnknownRotor { .. }))
        ));

        let mut config = abcd_config();
        config.iteration = -1;
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(
                ConfigurationError::NegativeIteration { found: -1 }
            ))
        ));

        let mut config = abcd_config();
        config.rotation_factor = -2;
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Configuration(
                ConfigurationError::InvalidRotationFactor { found: -2 }
            ))
        ));
    }

    #[test]
    fn pretest_soundness_failures() {
        let mut config = abcd_config();
        config.rotor_wirings.insert("r1".into(), vec![0, 0, 1, 2]);
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Validation(ValidationError::WiringRepeat { .. }))
        ));

        let mut config = abcd_config();
        config.alphabet = vec!['A', 'B', 'C', 'A'];
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Validation(ValidationError::DuplicateSymbol {
                symbol: 'A'
            }))
        ));

        let mut config = abcd_config();
        config.plugboard_cycles = vec!["AB".into(), "BC".into()];
        assert!(matches!(
            pretest(&config),
            Err(EnigmaError::Validation(ValidationError::CycleOverlap { .. }))
        ));
    }
}
