//! Per-owner year registry.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::YearError;
use super::types::YearView;

/// Which year is open and which years are closed for one owner.
///
/// Stored inside the owner's profile document. Invariant: `active_year` is
/// never in `archived_years`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRegistry {
    /// Year currently open for editing.
    pub active_year: i32,
    /// Closed, read-only years.
    #[serde(default)]
    pub archived_years: BTreeSet<i32>,
    /// Closure timestamp per archived year.
    #[serde(default)]
    pub year_closure_dates: BTreeMap<i32, DateTime<Utc>>,
    /// Set once legacy records have been tagged with a year.
    #[serde(default)]
    pub migration_completed: bool,
    /// When the migration ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated_at: Option<DateTime<Utc>>,
}

impl YearRegistry {
    /// Creates a registry with `active_year` open and nothing archived.
    #[must_use]
    pub fn new(active_year: i32) -> Self {
        Self {
            active_year,
            archived_years: BTreeSet::new(),
            year_closure_dates: BTreeMap::new(),
            migration_completed: false,
            migrated_at: None,
        }
    }

    /// Registry written by the legacy migration.
    #[must_use]
    pub fn migrated(active_year: i32, at: DateTime<Utc>) -> Self {
        Self {
            migration_completed: true,
            migrated_at: Some(at),
            ..Self::new(active_year)
        }
    }

    /// True when `year` has been closed.
    #[must_use]
    pub fn is_archived(&self, year: i32) -> bool {
        self.archived_years.contains(&year)
    }

    /// True when `year` is open for editing.
    #[must_use]
    pub fn is_active(&self, year: i32) -> bool {
        self.active_year == year
    }

    /// Looks up a year without changing anything.
    pub fn view(&self, year: i32) -> Result<YearView, YearError> {
        let is_active = self.is_active(year);
        let is_archived = self.is_archived(year);
        if !is_active && !is_archived {
            return Err(YearError::YearNotFound(year));
        }
        Ok(YearView {
            year,
            is_archived,
            is_active,
        })
    }

    /// Every known year, newest first.
    #[must_use]
    pub fn years(&self) -> Vec<YearView> {
        let mut years: BTreeSet<i32> = self.archived_years.clone();
        years.insert(self.active_year);
        years
            .into_iter()
            .rev()
            .map(|year| YearView {
                year,
                is_archived: self.is_archived(year),
                is_active: self.is_active(year),
            })
            .collect()
    }

    /// Fails unless `year` is the active year.
    pub fn ensure_active(&self, year: i32) -> Result<(), YearError> {
        if self.is_active(year) {
            Ok(())
        } else {
            Err(YearError::NotActive {
                year,
                active_year: self.active_year,
            })
        }
    }

    /// First year after `year` that is not archived.
    #[must_use]
    pub fn next_open_year(&self, year: i32) -> i32 {
        let mut next = year + 1;
        while self.is_archived(next) {
            next += 1;
        }
        next
    }

    /// Records the closure of `year` and returns the new active year.
    pub fn record_closure(&mut self, year: i32, at: DateTime<Utc>) -> i32 {
        self.archived_years.insert(year);
        self.year_closure_dates.insert(year, at);
        self.active_year = self.next_open_year(year);
        self.active_year
    }

    /// Reopens `year` and makes it the active year.
    pub fn record_unlock(&mut self, year: i32) {
        self.archived_years.remove(&year);
        self.year_closure_dates.remove(&year);
        self.active_year = year;
    }
}
