//! Random configuration generation.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand_core::RngCore;

use crate::alphabet::Alphabet;
use crate::config::Configuration;
use crate::error::EnigmaError;
use crate::reflector::ReflectorKind;

/// Shape of a configuration to generate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenOptions {
    pub rotors: usize,
    pub plug_cycles: usize,
    pub cycle_len: usize,
    pub rotation_factor: u64,
    pub reflector: ReflectorKind,
}

impl Default for KeygenOptions {
    fn default() -> Self {
        Self {
            rotors: 3,
            plug_cycles: 0,
            cycle_len: 2,
            rotation_factor: 0,
            reflector: ReflectorKind::Mirror,
        }
    }
}

/// Generates shuffled rotor wirings named `r1..rN` and disjoint plug cycles.
///
/// Plug cycles are cut from a shuffled copy of the alphabet; generation stops
/// early once fewer than `cycle_len` symbols remain. The iteration seed is
/// always 0.
pub fn generate_configuration<R: RngCore + ?Sized>(
    symbols: &[char],
    options: &KeygenOptions,
    rng: &mut R,
) -> Result<Configuration, EnigmaError> {
    let alphabet = Alphabet::new(symbols)?;
    let size = alphabet.len();

    let mut rotor_wirings = BTreeMap::new();
    let mut rotor_sequence = Vec::with_capacity(options.rotors);
    for slot in 1..=options.rotors {
        let mut wiring: Vec<i64> = (0..size as i64).collect();
        wiring.shuffle(rng);
        let name = format!("r{slot}");
        rotor_wirings.insert(name.clone(), wiring);
        rotor_sequence.push(name);
    }
    // the wiring map is ordered by name; order the stack independently
    rotor_sequence.shuffle(rng);

    let mut pool = alphabet.symbols().to_vec();
    pool.shuffle(rng);
    let cycle_len = options.cycle_len.max(2);
    let plugboard_cycles: Vec<String> = pool
        .chunks_exact(cycle_len)
        .take(options.plug_cycles)
        .map(|chunk| chunk.iter().collect())
        .collect();

    let config = Configuration {
        alphabet: alphabet.symbols().to_vec(),
        number_of_rotors: options.rotors,
        rotor_wirings,
        rotor_sequence,
        iteration: 0,
        rotation_factor: i64::try_from(options.rotation_factor).unwrap_or(i64::MAX),
        plugboard_cycles,
        reflector: options.reflector,
    };
    debug!(
        "generated configuration alphabet={} rotors={:?} plug_cycles={} fingerprint={}",
        size,
        config.rotor_sequence,
        config.plugboard_cycles.len(),
        config.fingerprint()
    );
    Ok(config)
}

/// [`generate_configuration`] driven by the operating system RNG.
pub fn generate_configuration_os(
    symbols: &[char],
    options: &KeygenOptions,
) -> Result<Configuration, EnigmaError> {
    generate_configuration(symbols, options, &mut OsRng)
}

/// Draws a random starting iteration below `bound`.
pub fn random_iteration<R: RngCore>(rng: &mut R, bound: u32) -> i64 {
    i64::from(rng.gen_range(0..bound.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::EnigmaMachine;
    use crate::validation::pretest;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn latin() -> Vec<char> {
        ('A'..='Z').collect()
    }

    #[test]
    fn generated_configuration_passes_pretest() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let options = KeygenOptions {
            rotors: 5,
            plug_cycles: 4,
            cycle_len: 3,
            rotation_factor: 2,
            reflector: ReflectorKind::Mirror,
        };
        let config = generate_configuration(&latin(), &options, &mut rng).unwrap();
        assert!(pretest(&config).is_ok());
        assert_eq!(config.rotor_wirings.len(), 5);
        assert_eq!(config.plugboard_cycles.len(), 4);
        assert!(config.plugboard_cycles.iter().all(|c| c.chars().count() == 3));
        assert_eq!(config.rotation_factor, 2);
    }

    #[test]
    fn same_seed_same_configuration() {
        let options = KeygenOptions::default();
        let a = generate_configuration(&latin(), &options, &mut ChaCha20Rng::seed_from_u64(1))
            .unwrap();
        let b = generate_configuration(&latin(), &options, &mut ChaCha20Rng::seed_from_u64(1))
            .unwrap();
        let c = generate_configuration(&latin(), &options, &mut ChaCha20Rng::seed_from_u64(2))
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn plug_cycles_capped_by_alphabet() {
        let options = KeygenOptions {
            plug_cycles: 10,
            cycle_len: 2,
            ..KeygenOptions::default()
        };
        let config =
            generate_configuration(&['a', 'b', 'c', 'd', 'e'], &options, &mut OsRng).unwrap();
        assert_eq!(config.plugboard_cycles.len(), 2);
        assert!(pretest(&config).is_ok());
    }

    #[test]
    fn generated_machine_round_trips() {
        let config = generate_configuration_os(&latin(), &KeygenOptions::default()).unwrap();
        let mut encoder = EnigmaMachine::new(&config).unwrap();
        let mut decoder = EnigmaMachine::new(&config).unwrap();
        let ciphertext = encoder.process_str("ATTACKATDAWN").unwrap();
        assert_eq!(decoder.process_str(&ciphertext).unwrap(), "ATTACKATDAWN");
    }

    #[test]
    fn random_iteration_respects_bound() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..100 {
            let value = random_iteration(&mut rng, 10);
            assert!((0..10).contains(&value));
        }
        assert_eq!(random_iteration(&mut rng, 0), 0);
    }
}
