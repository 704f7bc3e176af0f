use std::collections::HashMap;

use crate::error::{ConfigurationError, EnigmaError, ValidationError};

/// Ordered set of symbols defining the index space `[0, N)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    pub fn new(symbols: &[char]) -> Result<Self, EnigmaError> {
        if symbols.is_empty() {
            return Err(ConfigurationError::EmptyAlphabet.into());
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (position, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, position).is_some() {
                return Err(ValidationError::DuplicateSymbol { symbol }.into());
            }
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn index_of(&self, symbol: char) -> Result<usize, EnigmaError> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::InvalidCharacter { symbol })
    }

    /// Panics if `index >= len()`; indices produced inside the machine never are.
    pub fn symbol_at(&self, index: usize) -> char {
        self.symbols[index]
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}
