//! Board states reduced to the multiset of their stick groups.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use sorted_vec::SortedVec;

use crate::{
    error::{Error, IllegalMove, Result},
    moves::MoveShape,
};

/// A board state as the multiset of its group sizes.
///
/// Two rows with the same group sizes are the same configuration, whatever the order or
/// position of their groups. The canonical form lists groups largest first; it is what
/// `Eq`, `Ord`, `Hash`, `Display` and serialization see.
#[derive(Clone, Serialize, Deserialize)]
#[serde(into = "Vec<usize>", try_from = "Vec<i64>")]
pub struct Configuration {
    // ascending, the canonical form is read backwards
    groups: SortedVec<usize>,
}

/// Validates and sorts raw group sizes into a configuration.
///
/// Fails with [`Error::InvalidState`] when a group holds less than one stick.
pub fn canonicalize<I>(groups: I) -> Result<Configuration>
where
    I: IntoIterator<Item = i64>,
{
    let groups = groups
        .into_iter()
        .map(|group| {
            usize::try_from(group)
                .ok()
                .filter(|size| *size > 0)
                .ok_or(Error::InvalidState { group })
        })
        .collect::<Result<Vec<usize>>>()?;
    Ok(Configuration {
        groups: SortedVec::from_unsorted(groups),
    })
}

impl Configuration {
    /// Builds a configuration from group sizes in any order.
    pub fn new<I>(groups: I) -> Result<Configuration>
    where
        I: IntoIterator<Item = usize>,
    {
        let groups: Vec<usize> = groups.into_iter().collect();
        if groups.contains(&0) {
            return Err(Error::InvalidState { group: 0 });
        }
        Ok(Configuration {
            groups: SortedVec::from_unsorted(groups),
        })
    }

    /// The starting row of `sticks` adjacent sticks.
    pub fn single(sticks: usize) -> Result<Configuration> {
        if sticks == 0 {
            return Err(Error::InvalidParameter {
                name: "stick count",
                value: 0,
            });
        }
        Ok(Configuration {
            groups: SortedVec::from_unsorted(vec![sticks]),
        })
    }

    /// The configuration left once every stick is taken.
    pub fn empty() -> Configuration {
        Configuration {
            groups: SortedVec::from_unsorted(Vec::new()),
        }
    }

    /// Group sizes in canonical (non-increasing) order.
    pub fn groups(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.groups.iter().rev().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.groups().collect()
    }

    pub fn total_sticks(&self) -> usize {
        self.groups.iter().sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn largest(&self) -> Option<usize> {
        self.groups.last().copied()
    }

    /// Returns true if every group of `other` can be matched by a distinct group of `self`.
    pub fn contains(&self, other: &Configuration) -> bool {
        self.without(other).is_some()
    }

    /// Removes the groups of `other` from `self`, one occurrence each.
    pub fn without(&self, other: &Configuration) -> Option<Configuration> {
        let mut rest = self.groups.clone();
        for group in other.groups.iter() {
            rest.remove_item(group)?;
        }
        Some(Configuration { groups: rest })
    }

    /// Replaces one group of size `group` with the non-empty parts among `parts`.
    pub(crate) fn replace(&self, group: usize, parts: [usize; 2]) -> Option<Configuration> {
        let mut groups = self.groups.clone();
        groups.remove_item(&group)?;
        for part in parts {
            if part > 0 {
                groups.insert(part);
            }
        }
        Some(Configuration { groups })
    }

    /// The configuration left after playing `shape`.
    pub fn after(&self, shape: MoveShape) -> Result<Configuration> {
        if shape.take == 0 {
            return Err(IllegalMove::Empty.into());
        }
        let right = shape
            .group
            .checked_sub(shape.take)
            .and_then(|rest| rest.checked_sub(shape.offset));
        let Some(right) = right else {
            return Err(Error::InvalidParameter {
                name: "take",
                value: shape.take as i64,
            });
        };
        self.replace(shape.group, [shape.offset, right])
            .ok_or(Error::InvalidParameter {
                name: "move group",
                value: shape.group as i64,
            })
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.groups.as_slice() == other.groups.as_slice()
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.groups.as_slice().hash(state);
    }
}

impl PartialOrd for Configuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Configuration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.groups().cmp(other.groups())
    }
}

impl Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, group) in self.groups().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", group)?;
        }
        write!(f, "]")
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration{}", self)
    }
}

impl From<Configuration> for Vec<usize> {
    fn from(value: Configuration) -> Self {
        value.to_vec()
    }
}

impl TryFrom<Vec<i64>> for Configuration {
    type Error = Error;

    fn try_from(value: Vec<i64>) -> Result<Self> {
        canonicalize(value)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Configuration {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let count = <usize as quickcheck::Arbitrary>::arbitrary(g) % 5;
        let groups = (0..count).map(|_| 1 + <usize as quickcheck::Arbitrary>::arbitrary(g) % 4);
        Configuration {
            groups: SortedVec::from_unsorted(groups.collect()),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            quickcheck::Arbitrary::shrink(&self.to_vec())
                .filter_map(|groups| Configuration::new(groups.into_iter().filter(|g| *g > 0)).ok()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, QuickCheck};

    #[test]
    fn canonical_form_is_non_increasing() {
        let config = canonicalize([1, 3, 2, 3]).unwrap();
        assert_eq!(config.to_vec(), vec![3, 3, 2, 1]);
        assert_eq!(config.total_sticks(), 9);
        assert_eq!(config.group_count(), 4);
        assert_eq!(config.to_string(), "[3, 3, 2, 1]");
    }

    #[test]
    fn order_of_groups_does_not_matter() {
        assert_eq!(
            Configuration::new([1, 6, 3]).unwrap(),
            Configuration::new([6, 3, 1]).unwrap()
        );
    }

    #[test]
    fn non_positive_groups_are_rejected() {
        assert_eq!(canonicalize([3, 0, 1]), Err(Error::InvalidState { group: 0 }));
        assert_eq!(canonicalize([4, -2]), Err(Error::InvalidState { group: -2 }));
        assert_eq!(
            Configuration::new([2, 0]),
            Err(Error::InvalidState { group: 0 })
        );
        assert!(matches!(
            Configuration::single(0),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn empty_configuration_is_terminal() {
        let empty = Configuration::empty();
        assert!(empty.is_terminal());
        assert_eq!(empty.total_sticks(), 0);
        assert_eq!(empty.group_count(), 0);
        assert_eq!(canonicalize(Vec::new()).unwrap(), empty);
        assert!(!Configuration::single(1).unwrap().is_terminal());
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let mut qc = QuickCheck::new();
        let test = |c: Configuration| {
            let again = canonicalize(c.groups().map(|g| g as i64)).unwrap();
            assert_eq!(again.to_vec(), c.to_vec());
            assert_eq!(again, c);
        };
        qc.quickcheck(test as fn(Configuration));
    }

    #[test]
    fn without_removes_one_occurrence_per_group() {
        let config = Configuration::new([3, 3, 1, 1]).unwrap();
        let part = Configuration::new([3, 1]).unwrap();
        assert_eq!(config.without(&part), Configuration::new([3, 1]).ok());
        assert!(config.contains(&part));
        assert!(!part.contains(&config));
    }

    #[test]
    fn after_splits_the_touched_group() {
        let config = Configuration::new([6, 3]).unwrap();
        let shape = MoveShape {
            group: 6,
            take: 2,
            offset: 1,
        };
        assert_eq!(
            config.after(shape).unwrap(),
            Configuration::new([3, 3, 1]).unwrap()
        );
        let too_far = MoveShape {
            group: 6,
            take: 3,
            offset: 4,
        };
        assert!(config.after(too_far).is_err());
        let missing = MoveShape {
            group: 5,
            take: 1,
            offset: 0,
        };
        assert_eq!(
            config.after(missing),
            Err(Error::InvalidParameter {
                name: "move group",
                value: 5
            })
        );
    }

    #[test]
    fn serializes_as_canonical_list() {
        let config = Configuration::new([1, 2, 2]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, "[2,2,1]");
        let back: Configuration = serde_json::from_str("[1,2,2]").unwrap();
        assert_eq!(back, config);
        assert!(serde_json::from_str::<Configuration>("[2,0]").is_err());
    }

    #[test]
    fn arbitrary_configurations_shrink_to_valid_ones() {
        let config = Configuration::new([4, 2, 1]).unwrap();
        for smaller in config.shrink() {
            assert!(smaller.groups().all(|g| g > 0));
        }
    }
}
