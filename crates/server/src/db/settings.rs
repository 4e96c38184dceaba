//! Site settings storage.
//!
//! One row, five JSONB section blobs. The repository hands the raw blobs to
//! `dealgrove_core::settings` for the defaults merge; it never interprets
//! them itself, which is what keeps old rows readable after new fields are
//! added to a section.

use serde_json::Value as JsonValue;
use sqlx::PgPool;

use dealgrove_core::settings::{StoredSections, Theme};

use super::RepositoryError;

/// The settings row as stored.
#[derive(Debug, Clone)]
pub struct SettingsRecord {
    pub id: i64,
    pub sections: StoredSections,
}

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    id: i64,
    nav_bar: Option<JsonValue>,
    colors: Option<JsonValue>,
    general: Option<JsonValue>,
    seo: Option<JsonValue>,
    text_content: Option<JsonValue>,
    theme: String,
}

impl SettingsRow {
    fn into_record(self) -> SettingsRecord {
        SettingsRecord {
            id: self.id,
            sections: StoredSections {
                nav_bar: self.nav_bar,
                colors: self.colors,
                general: self.general,
                seo: self.seo,
                text_content: self.text_content,
                // An unknown stored theme falls back to the default rather
                // than poisoning every page render.
                theme: self.theme.parse::<Theme>().ok(),
            },
        }
    }
}

/// Repository for the singleton site settings row.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the settings row, if one has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self) -> Result<Option<SettingsRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT id, nav_bar, colors, general, seo, text_content, theme \
             FROM site_settings ORDER BY id LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(SettingsRow::into_record))
    }

    /// Persist the sections: UPDATE when a row id is known, INSERT otherwise.
    ///
    /// Returns the row id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn save(
        &self,
        id: Option<i64>,
        sections: &StoredSections,
    ) -> Result<i64, RepositoryError> {
        let theme = sections.theme.unwrap_or_default().to_string();

        if let Some(id) = id {
            sqlx::query(
                "UPDATE site_settings SET nav_bar = $2, colors = $3, general = $4, seo = $5, \
                 text_content = $6, theme = $7, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(&sections.nav_bar)
            .bind(&sections.colors)
            .bind(&sections.general)
            .bind(&sections.seo)
            .bind(&sections.text_content)
            .bind(theme)
            .execute(self.pool)
            .await?;
            Ok(id)
        } else {
            let row: (i64,) = sqlx::query_as(
                "INSERT INTO site_settings (nav_bar, colors, general, seo, text_content, theme) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
            )
            .bind(&sections.nav_bar)
            .bind(&sections.colors)
            .bind(&sections.general)
            .bind(&sections.seo)
            .bind(&sections.text_content)
            .bind(theme)
            .fetch_one(self.pool)
            .await?;
            Ok(row.0)
        }
    }
}
