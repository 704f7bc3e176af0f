//! Rotor stepping cadences.
//!
//! A [`SteppingRule`] decides, from the machine's iteration counter and a
//! rotor's position in the stack, whether that rotor advances on the current
//! symbol. The counter is owned by the machine and passed in on every call.

use std::fmt::Debug;

pub trait SteppingRule: Debug + Send + Sync {
    /// Whether the rotor at `position` steps while `iteration` is being processed.
    fn should_step(&self, iteration: u64, position: usize) -> bool;

    /// Offset of the rotor at `position` when the machine starts at `seed`.
    fn initial_offset(&self, _seed: u64, _position: usize, _size: usize) -> usize {
        0
    }
}

/// Odometer carry: rotor `p` steps once per full revolution of rotor `p - 1`.
///
/// Every rotor has `size` positions, so rotor `p` steps on iterations
/// divisible by `size^p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassicStepping {
    size: u64,
}

impl ClassicStepping {
    pub fn new(size: usize) -> Self {
        Self { size: size as u64 }
    }
}

impl SteppingRule for ClassicStepping {
    fn should_step(&self, iteration: u64, position: usize) -> bool {
        steps_at(period(self.size, position), iteration)
    }

    fn initial_offset(&self, seed: u64, position: usize, size: usize) -> usize {
        steps_before(period(self.size, position), seed, size)
    }
}

/// Rotor `p` steps on iterations divisible by `factor^p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FactorStepping {
    factor: u64,
}

impl FactorStepping {
    pub fn new(factor: u64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> u64 {
        self.factor
    }
}

impl SteppingRule for FactorStepping {
    fn should_step(&self, iteration: u64, position: usize) -> bool {
        steps_at(period(self.factor, position), iteration)
    }

    fn initial_offset(&self, seed: u64, position: usize, size: usize) -> usize {
        steps_before(period(self.factor, position), seed, size)
    }
}

/// Picks the built-in rule for a configured rotation factor: 0 selects the
/// classic odometer, anything else the factor cadence.
pub fn rule_for(rotation_factor: u64, size: usize) -> Box<dyn SteppingRule> {
    if rotation_factor == 0 {
        Box::new(ClassicStepping::new(size))
    } else {
        Box::new(FactorStepping::new(rotation_factor))
    }
}

/// `base^position`, or `None` once it no longer fits in a `u64`.
fn period(base: u64, position: usize) -> Option<u64> {
    u32::try_from(position)
        .ok()
        .and_then(|exp| base.checked_pow(exp))
}

fn steps_at(period: Option<u64>, iteration: u64) -> bool {
    match period {
        Some(0) => false,
        Some(period) => iteration % period == 0,
        // a period beyond u64 only divides iteration 0
        None => iteration == 0,
    }
}

/// Number of steps taken over iterations `[0, seed)`, reduced mod `size`.
fn steps_before(period: Option<u64>, seed: u64, size: usize) -> usize {
    let steps = match period {
        Some(0) => 0,
        Some(period) => seed.div_ceil(period),
        None => u64::from(seed > 0),
    };
    (steps % size as u64) as usize
}
