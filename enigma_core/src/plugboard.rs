use crate::alphabet::Alphabet;
use crate::error::EnigmaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One substitution cycle: `s[k]` maps to `s[k + 1]`, the last symbol wraps
/// to the first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlugCycle {
    symbols: Vec<char>,
}

impl PlugCycle {
    pub fn new(text: &str) -> Self {
        Self {
            symbols: text.chars().collect(),
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Returns the neighbour of `symbol` in `direction`, or `None` when the
    /// symbol is not part of this cycle.
    pub fn step(&self, symbol: char, direction: Direction) -> Option<char> {
        let len = self.symbols.len();
        let at = self.symbols.iter().position(|&s| s == symbol)?;
        let next = match direction {
            Direction::Forward => (at + 1) % len,
            Direction::Backward => (at + len - 1) % len,
        };
        Some(self.symbols[next])
    }
}

/// Disjoint plug cycles flattened into per-index lookup tables.
///
/// Cycles must already have passed [`check_cycles`](crate::validation::check_cycles);
/// symbols outside every cycle map to themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plugboard {
    cycles: Vec<PlugCycle>,
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl Plugboard {
    pub fn new<S: AsRef<str>>(alphabet: &Alphabet, cycles: &[S]) -> Result<Self, EnigmaError> {
        let cycles: Vec<PlugCycle> = cycles.iter().map(|c| PlugCycle::new(c.as_ref())).collect();
        let mut forward: Vec<usize> = (0..alphabet.len()).collect();
        let mut backward = forward.clone();
        for cycle in &cycles {
            for &symbol in cycle.symbols() {
                let from = alphabet.index_of(symbol)?;
                if let Some(next) = cycle.step(symbol, Direction::Forward) {
                    forward[from] = alphabet.index_of(next)?;
                }
                if let Some(prev) = cycle.step(symbol, Direction::Backward) {
                    backward[from] = alphabet.index_of(prev)?;
                }
            }
        }
        Ok(Self {
            cycles,
            forward,
            backward,
        })
    }

    pub fn identity(alphabet: &Alphabet) -> Self {
        let forward: Vec<usize> = (0..alphabet.len()).collect();
        Self {
            cycles: Vec::new(),
            backward: forward.clone(),
            forward,
        }
    }

    pub fn cycles(&self) -> &[PlugCycle] {
        &self.cycles
    }

    pub fn apply(&self, index: usize, direction: Direction) -> usize {
        match direction {
            Direction::Forward => self.forward[index],
            Direction::Backward => self.backward[index],
        }
    }

    pub fn apply_symbol(
        &self,
        alphabet: &Alphabet,
        symbol: char,
        direction: Direction,
    ) -> Result<char, EnigmaError> {
        let index = alphabet.index_of(symbol)?;
        Ok(alphabet.symbol_at(self.apply(index, direction)))
    }
}
