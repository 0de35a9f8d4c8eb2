//! Alias repository for VMAPP.
//!
//! This module provides CRUD operations for aliases in the database.

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;
use tracing::debug;
use validator::Validate;

use super::types::{Alias, AliasUpdate, NewAlias};
use crate::db::{DbPool, Timestamps};
use crate::{Result, VmappError};

const SELECT_ALIAS: &str = "SELECT id, email, alias, is_enabled, ctime, mtime FROM aliases";

/// Repository for alias CRUD operations.
pub struct AliasRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AliasRepository<'a> {
    /// Create a new AliasRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new alias in the database.
    ///
    /// Fails with a constraint violation if the (email, alias) pair exists.
    pub async fn create(&self, new_alias: &NewAlias) -> Result<Alias> {
        new_alias.validate()?;

        let ts = Timestamps::on_insert();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO aliases (email, alias, is_enabled, ctime, mtime)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_alias.email)
        .bind(&new_alias.alias)
        .bind(new_alias.is_enabled)
        .bind(ts.ctime)
        .bind(ts.mtime)
        .fetch_one(self.pool)
        .await?;

        debug!(id, email = %new_alias.email, alias = %new_alias.alias, "created alias");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VmappError::NotFound("alias".to_string()))
    }

    /// Get an alias by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Alias>> {
        let row: Option<AliasRow> = sqlx::query_as(&format!("{SELECT_ALIAS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(AliasRow::into_alias))
    }

    /// Update an alias by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated alias, or None if not found.
    pub async fn update(&self, id: i64, update: &AliasUpdate) -> Result<Option<Alias>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }
        update.validate()?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE aliases SET ");
        let mut separated = query.separated(", ");

        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email);
        }
        if let Some(ref alias) = update.alias {
            separated.push("alias = ");
            separated.push_bind_unseparated(alias);
        }
        if let Some(is_enabled) = update.is_enabled {
            separated.push("is_enabled = ");
            separated.push_bind_unseparated(is_enabled);
        }
        separated.push("mtime = ");
        separated.push_bind_unseparated(Timestamps::on_update());

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        debug!(id, "updated alias");
        self.get_by_id(id).await
    }

    /// Delete an alias by ID.
    ///
    /// Returns true if an alias was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM aliases WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all aliases ordered by email, then alias.
    pub async fn list_all(&self) -> Result<Vec<Alias>> {
        let rows: Vec<AliasRow> =
            sqlx::query_as(&format!("{SELECT_ALIAS} ORDER BY email, alias"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(AliasRow::into_alias).collect())
    }

    /// List the aliases registered for one email address.
    pub async fn list_for_email(&self, email: &str) -> Result<Vec<Alias>> {
        let rows: Vec<AliasRow> =
            sqlx::query_as(&format!("{SELECT_ALIAS} WHERE email = ? ORDER BY alias"))
                .bind(email)
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(AliasRow::into_alias).collect())
    }
}

/// Internal struct for mapping database rows to Alias.
#[derive(sqlx::FromRow)]
struct AliasRow {
    id: i64,
    email: String,
    alias: String,
    is_enabled: bool,
    ctime: DateTime<Utc>,
    mtime: DateTime<Utc>,
}

impl AliasRow {
    fn into_alias(self) -> Alias {
        Alias {
            id: self.id,
            email: self.email,
            alias: self.alias,
            is_enabled: self.is_enabled,
            ctime: self.ctime,
            mtime: self.mtime,
        }
    }
}
