//! Per-user session state and stale-response protection.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use taxbook_shared::types::OwnerId;

use crate::year::YearView;

/// Who is signed in and which year they are looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Signed-in owner.
    pub owner_id: OwnerId,
    /// Year open for editing.
    pub active_year: i32,
    /// Year currently displayed.
    pub viewed_year: i32,
}

impl Session {
    /// Starts a session viewing the active year.
    #[must_use]
    pub fn new(owner_id: OwnerId, active_year: i32) -> Self {
        Self {
            owner_id,
            active_year,
            viewed_year: active_year,
        }
    }

    /// Switches the displayed year to a year returned by a registry lookup.
    pub fn view(&mut self, view: &YearView) {
        self.viewed_year = view.year;
    }

    /// Records a new active year after closure or unlock and views it.
    pub fn set_active_year(&mut self, year: i32) {
        self.active_year = year;
        self.viewed_year = year;
    }

    /// Adopts `year` as the active year if it changed since the last load.
    ///
    /// A changed active year means a closure or unlock happened, so the
    /// view jumps to it. An unchanged year keeps the current view.
    pub fn sync_active_year(&mut self, year: i32) {
        if self.active_year != year {
            self.set_active_year(year);
        }
    }

    /// True when the displayed year cannot be edited.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.viewed_year != self.active_year
    }
}

/// Handle for one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Generation counter that lets only the newest refresh apply its result.
#[derive(Debug, Default)]
pub struct RefreshGate {
    generation: AtomicU64,
}

impl RefreshGate {
    /// Creates a gate with no refresh issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh, invalidating every earlier ticket.
    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// True when no newer refresh has started since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Returns `result` only if `ticket` is still current.
    pub fn accept<T>(&self, ticket: RefreshTicket, result: T) -> Option<T> {
        self.is_current(ticket).then_some(result)
    }
}
