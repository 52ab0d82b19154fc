//! Per-owner session state kept between requests.
//!
//! Each owner has one [`Session`] holding the active and the viewed year.
//! Every reload takes a ticket from the owner's [`RefreshGate`] before it
//! hits the store; when reloads overlap, only the newest one is applied.

use std::sync::Arc;

use dashmap::DashMap;
use taxbook_core::session::{RefreshGate, RefreshTicket, Session};
use taxbook_core::year::YearView;
use taxbook_db::{RepositoryError, YearRepository};
use taxbook_shared::types::OwnerId;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct OwnerSession {
    current: Mutex<Option<Session>>,
    gate: RefreshGate,
}

/// Sessions of every owner served by this process.
///
/// Cloning shares the same sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<OwnerId, Arc<OwnerSession>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, owner_id: &OwnerId) -> Arc<OwnerSession> {
        Arc::clone(self.sessions.entry(owner_id.clone()).or_default().value())
    }

    /// Reloads the active year and returns the owner's session.
    pub async fn refresh(
        &self,
        owner_id: &OwnerId,
        years: &YearRepository,
    ) -> Result<Session, RepositoryError> {
        let entry = self.entry(owner_id);
        let ticket = entry.gate.begin();
        let active_year = years.active_year(owner_id).await?;
        Ok(apply(&entry, ticket, owner_id, active_year, None).await)
    }

    /// Points the owner's session at `year`, which must be active or archived.
    pub async fn view_year(
        &self,
        owner_id: &OwnerId,
        year: i32,
        years: &YearRepository,
    ) -> Result<Session, RepositoryError> {
        let entry = self.entry(owner_id);
        let ticket = entry.gate.begin();
        let view = years.switch_to_year(owner_id, year).await?;
        let active_year = years.active_year(owner_id).await?;
        Ok(apply(&entry, ticket, owner_id, active_year, Some(view)).await)
    }
}

async fn apply(
    entry: &OwnerSession,
    ticket: RefreshTicket,
    owner_id: &OwnerId,
    active_year: i32,
    view: Option<YearView>,
) -> Session {
    let mut current = entry.current.lock().await;
    let session = current.get_or_insert_with(|| Session::new(owner_id.clone(), active_year));

    if entry.gate.is_current(ticket) {
        session.sync_active_year(active_year);
        if let Some(view) = view {
            session.view(&view);
        }
    } else {
        debug!(owner_id = %owner_id, "Discarded stale session reload");
    }
    session.clone()
}
