use crate::stepping::SteppingRule;

/// A stepping substitution unit.
///
/// The wiring is fixed; the offset models the contact disc turning over it.
/// An index entering at offset `o` is shifted by `o` before the wiring lookup
/// and shifted back by `o` afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    wiring: Vec<usize>,
    inverse: Vec<usize>,
    offset: usize,
    position: usize,
}

impl Rotor {
    /// `wiring` must already be a validated permutation of `[0, N)`.
    pub fn new(name: impl Into<String>, wiring: Vec<usize>, position: usize) -> Self {
        let mut inverse = vec![0; wiring.len()];
        for (from, &to) in wiring.iter().enumerate() {
            inverse[to] = from;
        }
        Self {
            name: name.into(),
            wiring,
            inverse,
            offset: 0,
            position,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset % self.size();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.wiring.len()
    }

    pub fn wiring(&self) -> &[usize] {
        &self.wiring
    }

    pub fn forward(&self, index: usize) -> usize {
        self.through(&self.wiring, index)
    }

    pub fn backward(&self, index: usize) -> usize {
        self.through(&self.inverse, index)
    }

    pub fn advance(&mut self) {
        self.offset = (self.offset + 1) % self.size();
    }

    /// Advances the rotor if `rule` says so for `iteration`; returns whether it stepped.
    pub fn step(&mut self, rule: &dyn SteppingRule, iteration: u64) -> bool {
        let stepped = rule.should_step(iteration, self.position);
        if stepped {
            self.advance();
        }
        stepped
    }

    fn through(&self, table: &[usize], index: usize) -> usize {
        let n = self.size();
        let contact = (index + self.offset) % n;
        (table[contact] + n - self.offset) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepping::FactorStepping;
    use proptest::prelude::*;

    #[test]
    fn offset_rotates_contacts() {
        let rotor = Rotor::new("r1", vec![1, 0, 3, 2], 0).with_offset(1);
        // contact (0 + 1) = 1 -> wiring 0 -> 0 - 1 = 3
        assert_eq!(rotor.forward(0), 3);
        assert_eq!(rotor.backward(3), 0);
        assert_eq!(rotor.forward(3), 0);
    }

    #[test]
    fn zero_offset_is_plain_wiring() {
        let rotor = Rotor::new("r1", vec![2, 0, 1], 0);
        assert_eq!(
            (0..3).map(|i| rotor.forward(i)).collect::<Vec<_>>(),
            vec![2, 0, 1]
        );
        assert_eq!(
            (0..3).map(|i| rotor.backward(i)).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn advance_wraps() {
        let mut rotor = Rotor::new("r", vec![0, 1, 2], 0).with_offset(2);
        rotor.advance();
        assert_eq!(rotor.offset(), 0);
    }

    #[test]
    fn step_follows_rule_for_position() {
        let rule = FactorStepping::new(2);
        let mut rotor = Rotor::new("r", vec![1, 2, 0], 1);
        assert!(rotor.step(&rule, 0));
        assert!(!rotor.step(&rule, 1));
        assert!(rotor.step(&rule, 2));
        assert_eq!(rotor.offset(), 2);
    }

    proptest! {
        #[test]
        fn backward_inverts_forward(
            wiring in Just((0..12usize).collect::<Vec<_>>()).prop_shuffle(),
            offset in 0usize..12,
        ) {
            let rotor = Rotor::new("p", wiring, 0).with_offset(offset);
            for x in 0..12 {
                prop_assert_eq!(rotor.backward(rotor.forward(x)), x);
                prop_assert_eq!(rotor.forward(rotor.backward(x)), x);
            }
        }
    }
}
