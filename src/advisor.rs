use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::{moves::distinct_moves, Configuration, Error, Evaluator, MoveShape, Result};

/// Picks moves from an evaluator's verdicts.
///
/// A winning mover always gets a move into a losing configuration. A losing mover gets
/// any legal move, since all of them lose against perfect play. Ties are broken by the
/// advisor's own generator, so a fixed seed gives a fixed sequence of choices.
#[derive(Debug, Clone)]
pub struct Advisor {
    evaluator: Evaluator,
    rng: StdRng,
}

impl Advisor {
    pub fn new(evaluator: Evaluator) -> Advisor {
        Advisor {
            evaluator,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(evaluator: Evaluator, seed: u64) -> Advisor {
        Advisor {
            evaluator,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Returns the configuration to leave the opponent with.
    pub fn choose_move(&mut self, config: &Configuration, max_take: usize) -> Result<Configuration> {
        if config.is_terminal() {
            return Err(Error::NoMovesAvailable);
        }
        let winning = self.evaluator.winning_moves(config, max_take)?;
        let candidates = if winning.is_empty() {
            distinct_moves(config, max_take)?
        } else {
            winning
        };
        candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or(Error::NoMovesAvailable)
    }

    /// Plays `shape` from either end of its group, both leave the same configuration.
    pub fn orient(&mut self, shape: MoveShape) -> MoveShape {
        if self.rng.random_bool(0.5) {
            shape.mirrored()
        } else {
            shape
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(groups: &[usize]) -> Configuration {
        Configuration::new(groups.iter().copied()).unwrap()
    }

    #[test]
    fn winning_mover_leaves_a_losing_configuration() {
        let evaluator = Evaluator::new();
        let mut advisor = Advisor::seeded(evaluator.clone(), 7);
        let start = config(&[10]);
        for _ in 0..20 {
            let next = advisor.choose_move(&start, 3).unwrap();
            assert!(evaluator.is_losing(&next, 3).unwrap());
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let evaluator = Evaluator::new();
        let mut a = Advisor::seeded(evaluator.clone(), 42);
        let mut b = Advisor::seeded(evaluator, 42);
        for groups in [&[10][..], &[6, 3], &[2, 2], &[4, 4, 1]] {
            let c = config(groups);
            assert_eq!(a.choose_move(&c, 3).unwrap(), b.choose_move(&c, 3).unwrap());
        }
    }

    #[test]
    fn losing_mover_still_moves() {
        let evaluator = Evaluator::new();
        let mut advisor = Advisor::seeded(evaluator.clone(), 1);
        let start = config(&[2, 2]);
        let next = advisor.choose_move(&start, 3).unwrap();
        assert!(next.total_sticks() < start.total_sticks());
        assert!(!evaluator.is_losing(&next, 3).unwrap());
        assert_eq!(
            advisor.choose_move(&config(&[1]), 3).unwrap(),
            Configuration::empty()
        );
    }

    #[test]
    fn orient_uses_both_ends_of_a_group() {
        let shape = MoveShape {
            group: 10,
            take: 1,
            offset: 6,
        };
        let mut offsets = vec![];
        for seed in 0..32 {
            let mut advisor = Advisor::seeded(Evaluator::new(), seed);
            offsets.push(advisor.orient(shape).offset);
        }
        assert!(offsets.iter().all(|offset| *offset == 6 || *offset == 3));
        assert!(offsets.contains(&6));
        assert!(offsets.contains(&3));
    }

    #[test]
    fn terminal_configuration_has_no_advice() {
        let mut advisor = Advisor::seeded(Evaluator::new(), 0);
        assert_eq!(
            advisor.choose_move(&Configuration::empty(), 3),
            Err(Error::NoMovesAvailable)
        );
    }
}
