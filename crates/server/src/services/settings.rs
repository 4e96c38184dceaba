//! Site settings service: load-with-merge and persist.

use serde_json::Value;
use sqlx::PgPool;

use dealgrove_core::settings::{SettingsSection, SiteSettings, Theme};

use crate::db::{RepositoryError, SettingsRepository};

/// Settings service errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A section patch produced values the section cannot hold.
    #[error("invalid settings payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Orchestrates the defaults merge and the singleton-row persistence.
pub struct SettingsService<'a> {
    repo: SettingsRepository<'a>,
}

impl<'a> SettingsService<'a> {
    /// Create a new settings service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: SettingsRepository::new(pool),
        }
    }

    /// The effective settings: stored sections merged over defaults, or the
    /// defaults outright when nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the load fails.
    pub async fn effective(&self) -> Result<SiteSettings, SettingsError> {
        let record = self.repo.load().await?;
        Ok(match record {
            Some(record) => SiteSettings::effective(&record.sections),
            None => SiteSettings::default(),
        })
    }

    /// Replace the settings wholesale.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the persist fails.
    pub async fn replace(&self, settings: &SiteSettings) -> Result<SiteSettings, SettingsError> {
        self.persist(settings).await?;
        Ok(settings.clone())
    }

    /// Patch one section and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidPayload` when the patch has
    /// wrongly-typed fields; nothing is persisted in that case.
    pub async fn patch_section(
        &self,
        section: SettingsSection,
        patch: &Value,
    ) -> Result<SiteSettings, SettingsError> {
        let current = self.effective().await?;
        let updated = current.with_section_patch(section, patch)?;
        self.persist(&updated).await?;
        Ok(updated)
    }

    /// Switch the light/dark theme and persist.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the persist fails.
    pub async fn set_theme(&self, theme: Theme) -> Result<SiteSettings, SettingsError> {
        let mut settings = self.effective().await?;
        settings.theme = theme;
        self.persist(&settings).await?;
        Ok(settings)
    }

    async fn persist(&self, settings: &SiteSettings) -> Result<(), SettingsError> {
        // UPDATE when a row exists, INSERT the implicit first row otherwise.
        let existing_id = self.repo.load().await?.map(|r| r.id);
        self.repo.save(existing_id, &settings.to_stored()).await?;
        Ok(())
    }
}
