use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::config::Configuration;
use crate::error::EnigmaError;
use crate::plugboard::{Direction, Plugboard};
use crate::reflector::{Reflector, check_reflector};
use crate::rotor::Rotor;
use crate::stepping::{SteppingRule, rule_for};
use crate::validation::{check_wiring, pretest};

/// Snapshot of the mutable machine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub iteration: u64,
    pub offsets: Vec<usize>,
}

/// Plugboard, rotor stack and reflector driven by a per-machine iteration
/// counter.
///
/// Each call to [`process`](Self::process) runs
/// plugboard -> rotors -> reflector -> rotors reversed -> plugboard and then
/// increments the counter. Rotors step on the forward leg only, right before
/// the signal passes through them.
#[derive(Debug)]
pub struct EnigmaMachine {
    alphabet: Alphabet,
    plugboard: Plugboard,
    rotors: Vec<Rotor>,
    reflector: Box<dyn Reflector>,
    stepping: Box<dyn SteppingRule>,
    iteration: u64,
}

impl EnigmaMachine {
    /// Validates `config` and builds a machine using the configured reflector
    /// and the stepping regime selected by `rotation_factor`.
    pub fn new(config: &Configuration) -> Result<Self, EnigmaError> {
        pretest(config)?;
        let size = config.alphabet.len();
        let reflector = config.reflector.build(size);
        let stepping = rule_for(config.rotation_factor as u64, size);
        Self::build(config, reflector, stepping)
    }

    /// Builds a machine with caller-supplied strategies. `config.reflector`
    /// and `config.rotation_factor` are validated but otherwise unused.
    pub fn with_strategies(
        config: &Configuration,
        reflector: Box<dyn Reflector>,
        stepping: Box<dyn SteppingRule>,
    ) -> Result<Self, EnigmaError> {
        pretest(config)?;
        Self::build(config, reflector, stepping)
    }

    fn build(
        config: &Configuration,
        reflector: Box<dyn Reflector>,
        stepping: Box<dyn SteppingRule>,
    ) -> Result<Self, EnigmaError> {
        let alphabet = Alphabet::new(&config.alphabet)?;
        let size = alphabet.len();
        check_reflector(reflector.as_ref(), size)?;
        let plugboard = Plugboard::new(&alphabet, &config.plugboard_cycles)?;
        let iteration = config.iteration as u64;

        let mut rotors = Vec::with_capacity(config.rotor_sequence.len());
        for (position, name) in config.rotor_sequence.iter().enumerate() {
            let raw = &config.rotor_wirings[name];
            let wiring = check_wiring(name, size, raw)?;
            let offset = stepping.initial_offset(iteration, position, size);
            rotors.push(Rotor::new(name.clone(), wiring, position).with_offset(offset));
        }

        debug!(
            "machine built alphabet={} rotors={:?} plug_cycles={} iteration={} stepping={:?} reflector={:?}",
            size,
            config.rotor_sequence,
            plugboard.cycles().len(),
            iteration,
            stepping,
            reflector
        );
        Ok(Self {
            alphabet,
            plugboard,
            rotors,
            reflector,
            stepping,
            iteration,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn state(&self) -> MachineState {
        MachineState {
            iteration: self.iteration,
            offsets: self.rotors.iter().map(Rotor::offset).collect(),
        }
    }

    /// Encodes or decodes one symbol.
    ///
    /// Fails without touching any state when `symbol` is outside the
    /// alphabet or the iteration counter is exhausted.
    pub fn process(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.index_of(symbol)?;
        let next_iteration = self
            .iteration
            .checked_add(1)
            .ok_or(EnigmaError::IterationOverflow)?;

        let mut signal = self.plugboard.apply(index, Direction::Forward);
        for rotor in self.rotors.iter_mut() {
            if rotor.step(self.stepping.as_ref(), self.iteration) {
                trace!(
                    "iteration={} rotor={} stepped to offset {}",
                    self.iteration,
                    rotor.name(),
                    rotor.offset()
                );
            }
            signal = rotor.forward(signal);
        }
        signal = self.reflector.reflect(signal);
        for rotor in self.rotors.iter().rev() {
            signal = rotor.backward(signal);
        }
        signal = self.plugboard.apply(signal, Direction::Backward);

        self.iteration = next_iteration;
        Ok(self.alphabet.symbol_at(signal))
    }

    /// Processes every symbol of `text` in order.
    ///
    /// All symbols are checked first, so a rejected string leaves the machine
    /// exactly as it was.
    pub fn process_str(&mut self, text: &str) -> Result<String, EnigmaError> {
        let mut count = 0u64;
        for symbol in text.chars() {
            self.alphabet.index_of(symbol)?;
            count += 1;
        }
        self.iteration
            .checked_add(count)
            .ok_or(EnigmaError::IterationOverflow)?;
        text.chars().map(|symbol| self.process(symbol)).collect()
    }
}
