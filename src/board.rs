//! The physical row of sticks a game is played on.

use std::{fmt::Display, str::FromStr};

use crate::{
    error::{check_max_take, Error, IllegalMove, Result},
    moves::{shape_between, MoveShape},
    Configuration,
};

const STICK: char = '|';
const GAP: char = '-';

/// A concrete move: take the sticks in slots `left..right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub left: usize,
    pub right: usize,
}

impl Move {
    /// Builds the move between two slot bounds given in either order.
    pub fn new(a: usize, b: usize) -> Move {
        Move {
            left: a.min(b),
            right: a.max(b),
        }
    }

    /// The move taking slots `first..=last` (0-based, in either order).
    pub fn between(first: usize, last: usize) -> Move {
        Move {
            left: first.min(last),
            right: first.max(last) + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }
}

/// Shows the move the way a player types it, with 1-based slots.
impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.len() {
            0 => write!(f, "-"),
            1 => write!(f, "{}", self.left + 1),
            _ => write!(f, "{}-{}", self.left + 1, self.right),
        }
    }
}

/// A line of slots, each holding a stick or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    slots: Vec<bool>,
}

impl Row {
    /// A full row of `size` sticks.
    pub fn new(size: usize) -> Row {
        Row {
            slots: vec![true; size],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no stick is left.
    pub fn is_empty(&self) -> bool {
        !self.slots.contains(&true)
    }

    pub fn sticks(&self) -> usize {
        self.slots.iter().filter(|slot| **slot).count()
    }

    pub fn has_stick(&self, slot: usize) -> bool {
        self.slots.get(slot).copied().unwrap_or(false)
    }

    /// Refills every slot.
    pub fn reset(&mut self) {
        self.slots.fill(true);
    }

    /// The `(start, size)` of each group of sticks, left to right.
    ///
    /// `||-|||--|` gives `[(0, 2), (3, 3), (8, 1)]`.
    pub fn groups(&self) -> Vec<(usize, usize)> {
        let mut groups = vec![];
        let mut start = None;
        for (i, stick) in self.slots.iter().copied().chain([false]).enumerate() {
            match (stick, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    groups.push((s, i - s));
                    start = None;
                }
                _ => (),
            }
        }
        groups
    }

    pub fn configuration(&self) -> Configuration {
        Configuration::new(self.groups().into_iter().map(|(_, size)| size))
            .expect("groups found on a row are never empty")
    }

    /// Checks that `m` only takes sticks and at most `max_take` of them.
    pub fn check(&self, m: Move, max_take: usize) -> Result<()> {
        check_max_take(max_take)?;
        if m.is_empty() {
            return Err(IllegalMove::Empty.into());
        }
        if m.right > self.len() {
            return Err(IllegalMove::OutOfBounds {
                right: m.right,
                len: self.len(),
            }
            .into());
        }
        if m.len() > max_take {
            return Err(IllegalMove::TooLarge {
                take: m.len(),
                max_take,
            }
            .into());
        }
        if let Some(slot) = (m.left..m.right).find(|slot| !self.slots[*slot]) {
            return Err(IllegalMove::ContainsGap { slot }.into());
        }
        Ok(())
    }

    /// Removes the sticks taken by `m`, after checking it is legal.
    pub fn play(&mut self, m: Move, max_take: usize) -> Result<()> {
        self.check(m, max_take)?;
        self.slots[m.left..m.right].fill(false);
        Ok(())
    }

    /// Realises `shape` on the leftmost group of the right size.
    pub fn locate(&self, shape: MoveShape) -> Option<Move> {
        if shape.take == 0 || shape.take + shape.offset > shape.group {
            return None;
        }
        let (start, _) = self
            .groups()
            .into_iter()
            .find(|(_, size)| *size == shape.group)?;
        let left = start + shape.offset;
        Some(Move::new(left, left + shape.take))
    }

    /// How this row's configuration turns into `target` in one move.
    pub fn shape_towards(&self, target: &Configuration, max_take: usize) -> Result<MoveShape> {
        check_max_take(max_take)?;
        let config = self.configuration();
        if config.is_terminal() {
            return Err(Error::NoMovesAvailable);
        }
        let shape = shape_between(&config, target).ok_or(Error::InvalidParameter {
            name: "unreachable target sticks",
            value: target.total_sticks() as i64,
        })?;
        if shape.take > max_take {
            return Err(IllegalMove::TooLarge {
                take: shape.take,
                max_take,
            }
            .into());
        }
        Ok(shape)
    }

    /// A concrete move turning this row's configuration into `target`.
    pub fn move_towards(&self, target: &Configuration, max_take: usize) -> Result<Move> {
        let shape = self.shape_towards(target, max_take)?;
        self.locate(shape).ok_or(Error::NoMovesAvailable)
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stick in &self.slots {
            write!(f, "{}", if *stick { STICK } else { GAP })?;
        }
        Ok(())
    }
}

impl FromStr for Row {
    type Err = Error;

    /// Parses rows such as `||-|||--|`.
    fn from_str(s: &str) -> Result<Row> {
        let slots = s
            .chars()
            .enumerate()
            .map(|(i, c)| match c {
                STICK => Ok(true),
                GAP => Ok(false),
                _ => Err(Error::InvalidParameter {
                    name: "row slot",
                    value: i as i64,
                }),
            })
            .collect::<Result<Vec<bool>>>()?;
        Ok(Row { slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(groups: &[usize]) -> Configuration {
        Configuration::new(groups.iter().copied()).unwrap()
    }

    #[test]
    fn groups_and_configuration() {
        let cases = [
            ("||||||||||", vec![(0, 10)], vec![10]),
            ("|||-||||||", vec![(0, 3), (4, 6)], vec![6, 3]),
            ("|||-|---||", vec![(0, 3), (4, 1), (8, 2)], vec![3, 2, 1]),
            ("--|-|---||", vec![(2, 1), (4, 1), (8, 2)], vec![2, 1, 1]),
            ("-----", vec![], vec![]),
            ("", vec![], vec![]),
        ];
        for (text, groups, canonical) in cases {
            let row: Row = text.parse().unwrap();
            assert_eq!(row.to_string(), text);
            assert_eq!(row.groups(), groups);
            assert_eq!(row.configuration().to_vec(), canonical);
        }
    }

    #[test]
    fn rejects_unknown_slots() {
        assert!("||x|".parse::<Row>().is_err());
    }

    #[test]
    fn play_checks_legality() {
        let mut row: Row = "|||-||||||".parse().unwrap();
        assert_eq!(
            row.play(Move::new(2, 5), 3),
            Err(Error::IllegalMove(IllegalMove::ContainsGap { slot: 3 }))
        );
        assert_eq!(
            row.play(Move::new(4, 8), 3),
            Err(Error::IllegalMove(IllegalMove::TooLarge {
                take: 4,
                max_take: 3
            }))
        );
        assert_eq!(
            row.play(Move::new(9, 11), 3),
            Err(Error::IllegalMove(IllegalMove::OutOfBounds {
                right: 11,
                len: 10
            }))
        );
        assert_eq!(
            row.play(Move::new(4, 4), 3),
            Err(Error::IllegalMove(IllegalMove::Empty))
        );
        row.play(Move::new(5, 8), 3).unwrap();
        assert_eq!(row.to_string(), "|||-|---||");
        assert_eq!(row.sticks(), 6);
    }

    #[test]
    fn empty_row_after_last_stick() {
        let mut row = Row::new(1);
        assert!(!row.is_empty());
        row.play(Move::between(0, 0), 3).unwrap();
        assert!(row.is_empty());
        assert!(row.configuration().is_terminal());
        row.reset();
        assert_eq!(row.sticks(), 1);
    }

    #[test]
    fn locate_uses_the_first_fitting_group() {
        let row: Row = "|||-|||||-".parse().unwrap();
        let shape = MoveShape {
            group: 5,
            take: 2,
            offset: 1,
        };
        assert_eq!(row.locate(shape), Some(Move::new(5, 7)));
        let too_long = MoveShape {
            group: 5,
            take: 5,
            offset: 1,
        };
        assert_eq!(row.locate(too_long), None);
    }

    #[test]
    fn move_towards_reaches_the_target() {
        let row = Row::new(10);
        let m = row.move_towards(&config(&[6, 3]), 3).unwrap();
        let mut played = row.clone();
        played.play(m, 3).unwrap();
        assert_eq!(played.configuration(), config(&[6, 3]));

        assert!(row.move_towards(&config(&[5]), 3).is_err());
        assert!(row.move_towards(&config(&[2, 2]), 3).is_err());
        assert_eq!(
            row.move_towards(&config(&[3, 3, 1]), 3),
            Err(Error::InvalidParameter {
                name: "unreachable target sticks",
                value: 7
            })
        );
        assert_eq!(
            row.shape_towards(&config(&[6, 3]), 3),
            Ok(MoveShape {
                group: 10,
                take: 1,
                offset: 6
            })
        );
    }

    #[test]
    fn moves_display_one_based() {
        assert_eq!(Move::between(2, 4).to_string(), "3-5");
        assert_eq!(Move::between(0, 0).to_string(), "1");
        assert_eq!(Move::new(4, 1).len(), 3);
    }
}
