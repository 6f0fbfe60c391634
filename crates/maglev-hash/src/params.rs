//! Per-backend `(offset, skip)` derivation.

use crate::key::HashKey;
use crate::permutation::Permutation;
use crate::prime::Modulus;

/// One permutation round: `c' = (offset + skip * c) mod M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// In `[0, M)`.
    pub offset: u64,
    /// In `[1, M-1]`, hence a generator of the additive group mod a prime `M`.
    pub skip: u64,
}

impl Step {
    /// Split a 64-bit digest: high half selects the offset, low half the skip.
    pub fn from_digest(digest: u64, modulus: Modulus) -> Self {
        let m = modulus.get();
        Self {
            offset: (digest >> 32) % m,
            skip: (digest & 0xffff_ffff) % (m - 1) + 1,
        }
    }

    #[inline]
    fn apply(self, c: u64, m: u64) -> u64 {
        if m <= u64::from(u32::MAX) {
            // offset + skip * c < m + m * m, which fits in u64 for 32-bit moduli.
            (self.offset + self.skip * c) % m
        } else {
            ((u128::from(self.offset) + u128::from(self.skip) * u128::from(c)) % u128::from(m))
                as u64
        }
    }
}

/// The `(offset, skip)` chain of one backend.
///
/// Rounds compose: the candidate slot for `cursor` folds `cursor` through
/// every step in order. A composition of affine bijections mod a prime is
/// itself a bijection, so the sequence still has period `M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParams {
    steps: Box<[Step]>,
    modulus: Modulus,
}

impl HashParams {
    /// Build from explicit steps (every step must be valid for `modulus`).
    pub fn from_steps(steps: Vec<Step>, modulus: Modulus) -> Self {
        debug_assert!(
            steps
                .iter()
                .all(|s| s.offset < modulus.get() && (1..modulus.get()).contains(&s.skip))
        );
        Self {
            steps: steps.into_boxed_slice(),
            modulus,
        }
    }

    /// The per-round steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The modulus these parameters were derived for.
    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    /// Candidate slot after `cursor` permutation steps.
    #[inline]
    pub fn candidate(&self, cursor: u64) -> usize {
        let m = self.modulus.get();
        let mut c = cursor % m;
        for step in self.steps.iter() {
            c = step.apply(c, m);
        }
        c as usize
    }

    /// Lazy permutation starting at `cursor`.
    pub fn permutation(&self, cursor: u64) -> Permutation<'_> {
        Permutation::new(self, cursor)
    }
}

/// Derive the `(offset, skip)` pair of one round.
pub fn generate_step(name: &str, modulus: Modulus, round: u32, key: HashKey) -> Step {
    Step::from_digest(key.digest(name, round), modulus)
}

/// Derive all `rounds` steps for a backend (at least one).
pub fn generate(name: &str, modulus: Modulus, rounds: u32, key: HashKey) -> HashParams {
    let steps = (0..rounds.max(1))
        .map(|round| generate_step(name, modulus, round, key))
        .collect();
    HashParams::from_steps(steps, modulus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(n: u64) -> Modulus {
        Modulus::new(n).unwrap()
    }

    #[test]
    fn test_known_steps_for_seven_slots() {
        let key = HashKey::default();
        assert_eq!(
            generate_step("backend-0", m(7), 0, key),
            Step { offset: 2, skip: 4 }
        );
        assert_eq!(
            generate_step("backend-1", m(7), 0, key),
            Step { offset: 0, skip: 5 }
        );
        assert_eq!(
            generate_step("backend-2", m(7), 0, key),
            Step { offset: 1, skip: 2 }
        );
    }

    #[test]
    fn test_skip_range() {
        let key = HashKey::default();
        for i in 0..500 {
            let step = generate_step(&format!("b{i}"), m(2), 0, key);
            assert_eq!(step.skip, 1);
            assert!(step.offset < 2);

            let step = generate_step(&format!("b{i}"), m(13), 0, key);
            assert!((1..13).contains(&step.skip));
            assert!(step.offset < 13);
        }
    }

    #[test]
    fn test_rounds_clamped_to_one() {
        let p = generate("backend-0", m(7), 0, HashKey::default());
        assert_eq!(p.steps().len(), 1);
    }

    #[test]
    fn test_single_round_candidates() {
        let p = generate("backend-0", m(7), 1, HashKey::default());
        let seq: Vec<usize> = (0..7).map(|c| p.candidate(c)).collect();
        assert_eq!(seq, vec![2, 6, 3, 0, 4, 1, 5]);
    }

    #[test]
    fn test_multi_round_is_bijection() {
        let modulus = m(101);
        for name in ["a", "b", "backend-17"] {
            let p = generate(name, modulus, 3, HashKey::default());
            let mut seen: Vec<usize> = (0..101).map(|c| p.candidate(c)).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), 101, "{name} does not cover every slot");
        }
    }

    #[test]
    fn test_candidate_wraps_cursor() {
        let p = generate("backend-2", m(7), 2, HashKey::default());
        for c in 0..7 {
            assert_eq!(p.candidate(c), p.candidate(c + 7));
        }
    }

    #[test]
    fn test_wide_modulus_does_not_overflow() {
        let modulus = Modulus::at_least(u64::from(u32::MAX) + 10);
        let p = HashParams::from_steps(
            vec![Step {
                offset: modulus.get() - 1,
                skip: modulus.get() - 1,
            }],
            modulus,
        );
        // (M-1) + (M-1)*(M-1) = M*(M-1) ≡ 0 (mod M)
        assert_eq!(p.candidate(modulus.get() - 1), 0);
    }
}
