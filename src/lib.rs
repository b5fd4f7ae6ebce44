mod entry;
use dashmap::DashMap;
use entry::Entry;
use rayon::prelude::*;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

pub mod advisor;
pub mod analysis;
pub mod board;
pub mod configuration;
pub mod error;
pub mod game;
pub mod moves;
pub mod player;


pub use advisor::Advisor;
pub use board::{Move, Row};
pub use configuration::{canonicalize, Configuration};
pub use entry::Outcome;
pub use error::{Error, IllegalMove, Result};
pub use moves::{is_reachable, legal_moves, shape_between, LegalMoves, MoveShape};

use crate::{error::check_max_take, moves::distinct_moves};

type Table = DashMap<Configuration, Entry>;

/// Bounds on the work a single evaluator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest total stick count that may be classified.
    pub max_sticks: usize,
    /// Largest number of cached configurations, summed over every `K`.
    pub max_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_sticks: 64,
            max_entries: 8_000_000,
        }
    }
}

/// Classifies configurations via memoized recursive search.
///
/// Clones share the same cache, so one evaluator can be handed to several threads or
/// players. Results are kept in one table per `K`.
#[derive(Debug, Clone)]
pub struct Evaluator {
    tables: Arc<DashMap<usize, Arc<Table>>>,
    cancel_flag: Arc<AtomicBool>,
    limits: Limits,
}

impl Evaluator {
    /// Constructs a new, empty evaluator.
    pub fn new() -> Evaluator {
        Evaluator::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Evaluator {
        Evaluator {
            tables: Arc::new(DashMap::new()),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            limits,
        }
    }

    /// The process-wide evaluator, created on first use.
    pub fn global() -> &'static Evaluator {
        static GLOBAL: OnceLock<Evaluator> = OnceLock::new();
        GLOBAL.get_or_init(Evaluator::new)
    }

    pub fn get_limits(&self) -> Limits {
        self.limits
    }

    /// Returns the number of entries stored in the evaluator cache, over every `K`.
    pub fn get_cache_size(&self) -> usize {
        self.tables.iter().map(|table| table.len()).sum()
    }

    /// Returns a handle to the evaluator's cancellation flag.
    /// Can be set externally to abort ongoing computation.
    pub fn get_cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }

    /// Returns every configuration classified so far under `max_take`.
    pub fn get_known_outcomes(&self, max_take: usize) -> Vec<(Configuration, Outcome)> {
        let Some(table) = self.tables.get(&max_take).map(|t| Arc::clone(t.value())) else {
            return vec![];
        };
        let mut known: Vec<_> = table
            .iter()
            .map(|e| (e.key().clone(), e.value().outcome()))
            .collect();
        known.sort();
        known
    }

    /// Forgets every cached result.
    pub fn clear(&self) {
        self.tables.clear();
    }

    /// Forgets the cached results of one rule set.
    pub fn clear_max_take(&self, max_take: usize) {
        self.tables.remove(&max_take);
    }

    /// Returns true if the player about to move from `config` loses against perfect play.
    ///
    /// The terminal configuration is not losing: whoever faces it did not take the last
    /// stick.
    pub fn is_losing(&self, config: &Configuration, max_take: usize) -> Result<bool> {
        Ok(self.get_outcome(config, max_take)? == Outcome::Losing)
    }

    pub fn get_outcome(&self, config: &Configuration, max_take: usize) -> Result<Outcome> {
        self.check(config, max_take)?;
        Ok(self.get_root_entry(config, max_take)?.outcome())
    }

    /// Every distinct move from `config` that leaves the opponent in a losing configuration.
    pub fn winning_moves(
        &self,
        config: &Configuration,
        max_take: usize,
    ) -> Result<Vec<Configuration>> {
        self.check(config, max_take)?;
        let table = self.table(max_take);
        let mut winning = vec![];
        for child in distinct_moves(config, max_take)? {
            if self.get_entry(&table, &child, max_take)?.is_losing() {
                winning.push(child);
            }
        }
        Ok(winning)
    }

    /// Picks the configuration to move to: a losing one for the opponent when there is
    /// one, else the first legal move in canonical order.
    pub fn choose_move(&self, config: &Configuration, max_take: usize) -> Result<Configuration> {
        self.check(config, max_take)?;
        if config.is_terminal() {
            return Err(Error::NoMovesAvailable);
        }
        let entry = self.get_root_entry(config, max_take)?;
        if let Some(refutation) = entry.refutation() {
            return Ok(refutation.clone());
        }
        distinct_moves(config, max_take)?
            .into_iter()
            .next()
            .ok_or(Error::NoMovesAvailable)
    }

    /// Classifies the opening row of `sticks` for every rule set in `max_takes`, in parallel.
    pub fn prewarm(&self, max_takes: &[usize], sticks: usize) -> Result<()> {
        let start = Configuration::single(sticks)?;
        max_takes
            .par_iter()
            .try_for_each(|&max_take| self.get_outcome(&start, max_take).map(|_| ()))?;
        log::info!(
            "prewarmed {} rule sets for {} sticks, {} cached entries",
            max_takes.len(),
            sticks,
            self.get_cache_size()
        );
        Ok(())
    }

    /// Fails with [`Error::ResourceExceeded`] when `sticks` is more than this evaluator
    /// accepts. Boards and analysis bounds from outside should pass through here first.
    pub fn check_sticks(&self, sticks: usize) -> Result<()> {
        if sticks > self.limits.max_sticks {
            log::warn!(
                "refusing to classify {} sticks, limit is {}",
                sticks,
                self.limits.max_sticks
            );
            return Err(Error::ResourceExceeded {
                limit: "stick count",
                value: self.limits.max_sticks,
            });
        }
        Ok(())
    }

    fn check(&self, config: &Configuration, max_take: usize) -> Result<()> {
        check_max_take(max_take)?;
        self.check_sticks(config.total_sticks())
    }

    fn table(&self, max_take: usize) -> Arc<Table> {
        Arc::clone(&self.tables.entry(max_take).or_default())
    }

    fn get_root_entry(&self, config: &Configuration, max_take: usize) -> Result<Entry> {
        let table = self.table(max_take);
        let cached = table.len();
        let entry = self.get_entry(&table, config, max_take)?;
        if table.len() > cached {
            log::debug!(
                "classified {} with K = {}: {:?} ({} new entries)",
                config,
                max_take,
                entry.outcome(),
                table.len() - cached
            );
        }
        Ok(entry)
    }

    /// Computes the entry of `config`, recursing into every child that is not cached yet.
    ///
    /// Returns `Err(Cancelled)` once the cancel flag is raised. No shard lock is held
    /// across the recursion.
    fn get_entry(&self, table: &Table, config: &Configuration, max_take: usize) -> Result<Entry> {
        if config.is_terminal() {
            return Ok(Entry::terminal());
        }
        if let Some(entry) = table.get(config) {
            return Ok(entry.value().clone());
        }
        if self.cancel_flag.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }

        let entry = if config.total_sticks() == 1 {
            // the mover has to take the last stick
            Entry::losing()
        } else {
            let mut entry = Entry::losing();
            for child in distinct_moves(config, max_take)? {
                if self.get_entry(table, &child, max_take)?.is_losing() {
                    entry = Entry::winning(child);
                    break;
                }
            }
            entry
        };

        if self.get_cache_size() >= self.limits.max_entries {
            log::warn!("evaluator cache is full ({} entries)", self.limits.max_entries);
            return Err(Error::ResourceExceeded {
                limit: "cache entries",
                value: self.limits.max_entries,
            });
        }
        // another thread may have got there first, both results are the same
        let stored = table.entry(config.clone()).or_insert(entry);
        Ok(stored.value().clone())
    }
}

/// Builds the single-group opening configuration.
pub fn new_configuration(total_sticks: usize) -> Result<Configuration> {
    Configuration::single(total_sticks)
}

/// [`Evaluator::is_losing`] on the process-wide evaluator.
pub fn is_losing(config: &Configuration, max_take: usize) -> Result<bool> {
    Evaluator::global().is_losing(config, max_take)
}

/// [`Evaluator::choose_move`] on the process-wide evaluator.
pub fn choose_move(config: &Configuration, max_take: usize) -> Result<Configuration> {
    Evaluator::global().choose_move(config, max_take)
}

pub fn is_terminal(config: &Configuration) -> bool {
    config.is_terminal()
}

pub fn total_sticks(config: &Configuration) -> usize {
    config.total_sticks()
}

pub fn group_count(config: &Configuration) -> usize {
    config.group_count()
}
