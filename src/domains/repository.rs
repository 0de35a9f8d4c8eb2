//! Domain repository for VMAPP.
//!
//! This module provides CRUD operations for domains in the database.

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;
use tracing::debug;
use validator::Validate;

use super::types::{Domain, DomainUpdate, NewDomain};
use crate::db::{DbPool, Timestamps};
use crate::{Result, VmappError};

const SELECT_DOMAIN: &str = "SELECT id, domain, is_enabled, ctime, mtime FROM domains";

/// Repository for domain CRUD operations.
pub struct DomainRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> DomainRepository<'a> {
    /// Create a new DomainRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new domain in the database.
    ///
    /// Fails with a validation error before writing, or with a constraint
    /// violation if the hostname already exists.
    pub async fn create(&self, new_domain: &NewDomain) -> Result<Domain> {
        new_domain.validate()?;

        let ts = Timestamps::on_insert();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO domains (domain, is_enabled, ctime, mtime)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_domain.domain)
        .bind(new_domain.is_enabled)
        .bind(ts.ctime)
        .bind(ts.mtime)
        .fetch_one(self.pool)
        .await?;

        debug!(id, domain = %new_domain.domain, "created domain");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VmappError::NotFound("domain".to_string()))
    }

    /// Get a domain by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Domain>> {
        let row: Option<DomainRow> = sqlx::query_as(&format!("{SELECT_DOMAIN} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(DomainRow::into_domain))
    }

    /// Get a domain by hostname.
    pub async fn get_by_name(&self, domain: &str) -> Result<Option<Domain>> {
        let row: Option<DomainRow> =
            sqlx::query_as(&format!("{SELECT_DOMAIN} WHERE domain = ?"))
                .bind(domain)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(DomainRow::into_domain))
    }

    /// Update a domain by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated domain, or None if not found.
    pub async fn update(&self, id: i64, update: &DomainUpdate) -> Result<Option<Domain>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }
        update.validate()?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE domains SET ");
        let mut separated = query.separated(", ");

        if let Some(ref domain) = update.domain {
            separated.push("domain = ");
            separated.push_bind_unseparated(domain);
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

        debug!(id, "updated domain");
        self.get_by_id(id).await
    }

    /// Delete a domain by ID, together with all of its users.
    ///
    /// Returns true if a domain was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM domains WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(id, "deleted domain");
        }
        Ok(deleted)
    }

    /// List all domains ordered by hostname.
    pub async fn list_all(&self) -> Result<Vec<Domain>> {
        let rows: Vec<DomainRow> = sqlx::query_as(&format!("{SELECT_DOMAIN} ORDER BY domain"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(DomainRow::into_domain).collect())
    }

    /// Count all domains.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM domains")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Internal struct for mapping database rows to Domain.
#[derive(sqlx::FromRow)]
struct DomainRow {
    id: i64,
    domain: String,
    is_enabled: bool,
    ctime: DateTime<Utc>,
    mtime: DateTime<Utc>,
}

impl DomainRow {
    fn into_domain(self) -> Domain {
        Domain {
            id: self.id,
            domain: self.domain,
            is_enabled: self.is_enabled,
            ctime: self.ctime,
            mtime: self.mtime,
        }
    }
}
