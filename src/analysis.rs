use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{error::check_max_take, Configuration, Error, Evaluator, Result};

/// Every configuration of exactly `sticks` sticks, in descending canonical order.
///
/// These are the integer partitions of `sticks`.
pub fn configurations(sticks: usize) -> Vec<Configuration> {
    let mut found = vec![];
    let mut groups = vec![];
    partitions(sticks, sticks, &mut groups, &mut found);
    found
}

fn partitions(rest: usize, largest: usize, groups: &mut Vec<usize>, found: &mut Vec<Configuration>) {
    if rest == 0 {
        if let Ok(config) = Configuration::new(groups.iter().copied()) {
            found.push(config);
        }
        return;
    }
    for group in (1..=largest.min(rest)).rev() {
        groups.push(group);
        partitions(rest - group, group, groups, found);
        groups.pop();
    }
}

/// Summary of the losing configurations up to some size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub max_take: usize,
    pub up_to: usize,
    /// Number of configurations with 1 to `up_to` sticks.
    pub configurations: usize,
    pub losing: Vec<Configuration>,
    pub principal: Vec<Configuration>,
}

impl Evaluator {
    /// Every losing configuration with 1 to `up_to` sticks, ordered by stick count, then
    /// group count, then descending canonical order.
    pub fn losing_configurations(&self, up_to: usize, max_take: usize) -> Result<Vec<Configuration>> {
        Ok(self.analyze(up_to, max_take)?.losing)
    }

    /// Classifies every configuration with 1 to `up_to` sticks, in parallel.
    pub fn analyze(&self, up_to: usize, max_take: usize) -> Result<Report> {
        check_max_take(max_take)?;
        if up_to < 1 {
            return Err(Error::InvalidParameter {
                name: "analysis bound",
                value: 0,
            });
        }
        self.check_sticks(up_to)?;

        let mut total = 0;
        let mut losing = vec![];
        for sticks in 1..=up_to {
            let mut candidates = configurations(sticks);
            // stable, so equal group counts stay in descending order
            candidates.sort_by_key(Configuration::group_count);
            total += candidates.len();
            let outcomes = candidates
                .par_iter()
                .map(|config| self.is_losing(config, max_take))
                .collect::<Result<Vec<bool>>>()?;
            losing.extend(
                candidates
                    .into_iter()
                    .zip(outcomes)
                    .filter_map(|(config, is_losing)| is_losing.then_some(config)),
            );
        }
        let principal = principal_losing_configurations(&losing);
        log::info!(
            "K = {}, up to {} sticks: {} configurations, {} losing, {} principal",
            max_take,
            up_to,
            total,
            losing.len(),
            principal.len()
        );
        Ok(Report {
            max_take,
            up_to,
            configurations: total,
            losing,
            principal,
        })
    }
}

/// Prunes a list of losing configurations down to the ones that are not made of
/// smaller losing pieces.
///
/// Configurations of one or two groups are always kept and all-ones configurations of
/// three or more groups are always dropped. Other configurations lose their trailing
/// pairs of ones, then every already-kept losing configuration they contain, as long as
/// what remains is still losing (or empty). Whatever is left is kept.
///
/// `losing` is expected in the order [`Evaluator::losing_configurations`] produces.
pub fn principal_losing_configurations(losing: &[Configuration]) -> Vec<Configuration> {
    let known: HashSet<&Configuration> = losing.iter().collect();
    let mut principal: Vec<Configuration> = vec![];

    for config in losing {
        if config.group_count() <= 2 {
            principal.push(config.clone());
            continue;
        }
        if config.largest() == Some(1) {
            continue;
        }

        let mut groups = config.to_vec();
        let ones = groups.iter().filter(|g| **g == 1).count();
        groups.truncate(groups.len() - (ones - ones % 2));
        let Ok(mut pruned) = Configuration::new(groups) else {
            continue;
        };

        // the first principal configuration is [1], never worth removing
        for part in principal.iter().skip(1) {
            while let Some(rest) = pruned.without(part) {
                if rest.is_terminal() || known.contains(&rest) {
                    pruned = rest;
                } else {
                    break;
                }
            }
            if pruned.is_terminal() {
                break;
            }
        }
        if !pruned.is_terminal() {
            principal.push(pruned);
        }
    }
    principal
}
