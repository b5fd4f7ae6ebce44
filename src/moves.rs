use serde::{Deserialize, Serialize};

use crate::{
    configuration::Configuration,
    error::{check_max_take, Error, Result},
};

/// The effect of a move on one group: take `take` sticks from a group of `group` sticks,
/// leaving `offset` of them on the left edge of the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveShape {
    pub group: usize,
    pub take: usize,
    pub offset: usize,
}

impl MoveShape {
    /// The same move seen from the other end of the group.
    pub fn mirrored(self) -> MoveShape {
        MoveShape {
            offset: self.group.saturating_sub(self.take + self.offset),
            ..self
        }
    }
}

/// Every configuration reachable from `config` in exactly one move.
///
/// The sequence is lazy and deterministic. The same resulting configuration may show up
/// more than once (taking from the left or the right edge of a group lands on the same
/// multiset), consumers dedup when they need to.
pub fn legal_moves(config: &Configuration, max_take: usize) -> Result<LegalMoves<'_>> {
    check_max_take(max_take)?;
    if config.is_terminal() {
        return Err(Error::NoMovesAvailable);
    }
    let mut sizes: Vec<usize> = config.groups().collect();
    // equal groups lead to equal results
    sizes.dedup();
    Ok(LegalMoves {
        config,
        max_take,
        sizes,
        index: 0,
        take: 1,
        offset: 0,
    })
}

/// Iterator returned by [`legal_moves`].
#[derive(Debug, Clone)]
pub struct LegalMoves<'a> {
    config: &'a Configuration,
    max_take: usize,
    sizes: Vec<usize>,
    index: usize,
    take: usize,
    offset: usize,
}

impl LegalMoves<'_> {
    /// The shape the iterator will yield next, advancing its cursor.
    fn next_shape(&mut self) -> Option<MoveShape> {
        loop {
            let group = *self.sizes.get(self.index)?;
            if self.take > group.min(self.max_take) {
                self.index += 1;
                self.take = 1;
                self.offset = 0;
                continue;
            }
            if self.offset > group - self.take {
                self.take += 1;
                self.offset = 0;
                continue;
            }
            let shape = MoveShape {
                group,
                take: self.take,
                offset: self.offset,
            };
            self.offset += 1;
            return Some(shape);
        }
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Configuration;

    fn next(&mut self) -> Option<Configuration> {
        let shape = self.next_shape()?;
        self.config
            .replace(shape.group, [shape.offset, shape.group - shape.take - shape.offset])
    }
}

/// Distinct one-move successors of `config`, in ascending canonical order.
pub(crate) fn distinct_moves(config: &Configuration, max_take: usize) -> Result<Vec<Configuration>> {
    let mut moves: Vec<Configuration> = legal_moves(config, max_take)?.collect();
    moves.sort_unstable();
    moves.dedup();
    Ok(moves)
}

/// Finds the single move turning `from` into `to`, ignoring the take limit.
///
/// When the touched group is split in two, the larger part is left on the left edge.
pub fn shape_between(from: &Configuration, to: &Configuration) -> Option<MoveShape> {
    let take = from.total_sticks().checked_sub(to.total_sticks())?;
    if take == 0 || from.group_count().abs_diff(to.group_count()) > 1 {
        return None;
    }

    // strip the groups both sides share, both lists are non-increasing
    let mut touched = vec![];
    let mut parts = vec![];
    let mut from_groups = from.groups().peekable();
    let mut to_groups = to.groups().peekable();
    loop {
        match (from_groups.peek().copied(), to_groups.peek().copied()) {
            (Some(a), Some(b)) if a == b => {
                from_groups.next();
                to_groups.next();
            }
            (Some(a), Some(b)) if a > b => touched.extend(from_groups.next()),
            (Some(_), Some(_)) | (None, Some(_)) => parts.extend(to_groups.next()),
            (Some(_), None) => touched.extend(from_groups.next()),
            (None, None) => break,
        }
    }

    match (touched.as_slice(), parts.as_slice()) {
        (&[group], []) => Some(MoveShape {
            group,
            take,
            offset: 0,
        }),
        (&[group], &[rest]) if rest + take == group => Some(MoveShape {
            group,
            take,
            offset: 0,
        }),
        (&[group], &[left, right]) if left + right + take == group => Some(MoveShape {
            group,
            take,
            offset: left,
        }),
        _ => None,
    }
}

/// Returns true if one move taking at most `max_take` sticks turns `from` into `to`.
pub fn is_reachable(from: &Configuration, to: &Configuration, max_take: usize) -> bool {
    shape_between(from, to).is_some_and(|shape| shape.take <= max_take)
}
