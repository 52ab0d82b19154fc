//! Profile repository: user profile fields and the year registry, both kept
//! in the owner's `users` document.

use serde_json::json;
use taxbook_core::profile::UserProfile;
use taxbook_core::tax::TaxConfig;
use taxbook_core::year::YearRegistry;
use taxbook_shared::TaxDefaults;
use taxbook_shared::types::OwnerId;
use tracing::info;

use super::RepositoryError;
use crate::store::{Document, SharedStore, collections, to_data};

/// Field whose presence marks an initialized registry.
const REGISTRY_MARKER: &str = "activeYear";

/// Profile and registry access.
#[derive(Clone)]
pub struct ProfileRepository {
    store: SharedStore,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn document(&self, owner_id: &OwnerId) -> Result<Option<Document>, RepositoryError> {
        Ok(self
            .store
            .get_document(collections::USERS, owner_id.as_str())
            .await?)
    }

    /// Loads the profile, `None` when the owner has no document.
    pub async fn load(&self, owner_id: &OwnerId) -> Result<Option<UserProfile>, RepositoryError> {
        match self.document(owner_id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Loads the year registry, `None` until one has been written.
    pub async fn registry(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Option<YearRegistry>, RepositoryError> {
        match self.document(owner_id).await? {
            Some(doc) if doc.field(REGISTRY_MARKER).is_some() => Ok(Some(doc.decode()?)),
            _ => Ok(None),
        }
    }

    /// Validates and stores profile fields without touching the registry.
    pub async fn save_profile(
        &self,
        owner_id: &OwnerId,
        profile: UserProfile,
    ) -> Result<UserProfile, RepositoryError> {
        let profile = profile.normalize()?;
        self.store
            .set_document(
                collections::USERS,
                owner_id.as_str(),
                to_data(&profile)?,
                true,
            )
            .await?;
        info!(owner_id = %owner_id, "Profile saved");
        Ok(profile)
    }

    /// Merges a freshly created registry into the owner's document.
    pub async fn init_registry(
        &self,
        owner_id: &OwnerId,
        registry: &YearRegistry,
    ) -> Result<(), RepositoryError> {
        self.store
            .set_document(
                collections::USERS,
                owner_id.as_str(),
                to_data(registry)?,
                true,
            )
            .await?;
        Ok(())
    }

    /// Replaces the registry fields of an existing document.
    ///
    /// Whole fields are replaced, so removed closure dates disappear.
    pub async fn update_registry(
        &self,
        owner_id: &OwnerId,
        registry: &YearRegistry,
    ) -> Result<(), RepositoryError> {
        let data = json!({
            "activeYear": registry.active_year,
            "archivedYears": registry.archived_years,
            "yearClosureDates": registry.year_closure_dates,
        });
        self.store
            .update_document(collections::USERS, owner_id.as_str(), data)
            .await?;
        Ok(())
    }

    /// Tax parameters from the profile, or `defaults` without one.
    pub async fn tax_config(
        &self,
        owner_id: &OwnerId,
        defaults: &TaxDefaults,
    ) -> Result<TaxConfig, RepositoryError> {
        Ok(self
            .load(owner_id)
            .await?
            .map_or_else(|| TaxConfig::from(defaults), |p| p.tax_config(defaults)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, InMemoryStore};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn repo() -> (Arc<InMemoryStore>, ProfileRepository) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), ProfileRepository::new(store))
    }

    #[tokio::test]
    async fn test_profile_and_registry_share_document() {
        let (store, repo) = repo();
        let owner = OwnerId::new("owner-1");

        repo.init_registry(&owner, &YearRegistry::migrated(2025, Utc::now()))
            .await
            .unwrap();
        repo.save_profile(
            &owner,
            UserProfile {
                name: "Jana".to_string(),
                bank_account: "SK31 1200 0000 1987 4263 7541".to_string(),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

        let registry = repo.registry(&owner).await.unwrap().unwrap();
        assert_eq!(registry.active_year, 2025);
        assert!(registry.migration_completed);

        let profile = repo.load(&owner).await.unwrap().unwrap();
        assert_eq!(profile.bank_account, "SK3112000000198742637541");

        let doc = store.get_document("users", "owner-1").await.unwrap().unwrap();
        assert_eq!(doc.data["name"], "Jana");
        assert_eq!(doc.data["activeYear"], 2025);
    }

    #[tokio::test]
    async fn test_profile_without_registry() {
        let (_, repo) = repo();
        let owner = OwnerId::new("owner-1");
        repo.save_profile(&owner, UserProfile::default()).await.unwrap();
        assert!(repo.registry(&owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected() {
        let (_, repo) = repo();
        let result = repo
            .save_profile(
                &OwnerId::new("owner-1"),
                UserProfile {
                    tax_id: "12".to_string(),
                    ..UserProfile::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_registry_drops_closure_dates() {
        let (_, repo) = repo();
        let owner = OwnerId::new("owner-1");
        let mut registry = YearRegistry::migrated(2025, Utc::now());
        repo.init_registry(&owner, &registry).await.unwrap();

        registry.record_closure(2025, Utc::now());
        repo.update_registry(&owner, &registry).await.unwrap();
        registry.record_unlock(2025);
        repo.update_registry(&owner, &registry).await.unwrap();

        let stored = repo.registry(&owner).await.unwrap().unwrap();
        assert!(stored.year_closure_dates.is_empty());
        assert_eq!(stored.active_year, 2025);
        assert!(stored.migration_completed);
    }

    #[tokio::test]
    async fn test_tax_config_defaults_without_profile() {
        let (_, repo) = repo();
        let config = repo
            .tax_config(&OwnerId::new("nobody"), &TaxDefaults::default())
            .await
            .unwrap();
        assert_eq!(config.rent_exemption_threshold, dec!(500));
        assert_eq!(config.tax_rate, dec!(0.19));
    }
}
