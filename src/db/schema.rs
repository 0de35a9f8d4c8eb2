//! Database schema and migrations for VMAPP.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. Timestamps are written by the repositories, not by column
//! defaults.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - domains, users (mailboxes), aliases
    r#"
-- Mail domains
CREATE TABLE domains (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    domain      TEXT NOT NULL UNIQUE,     -- RFC 1035 hostname
    is_enabled  INTEGER NOT NULL DEFAULT 1,
    ctime       TEXT NOT NULL,
    mtime       TEXT NOT NULL
);

-- Mailboxes, one per (username, domain)
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    domain_id   INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
    username    TEXT NOT NULL,
    password    TEXT NOT NULL,            -- {SHA512-CRYPT}$6$...
    quota       INTEGER NOT NULL DEFAULT 134217728 CHECK (quota >= 0),  -- bytes
    is_enabled  INTEGER NOT NULL DEFAULT 1,
    ctime       TEXT NOT NULL,
    mtime       TEXT NOT NULL,
    UNIQUE(username, domain_id)
);

CREATE INDEX idx_users_domain_id ON users(domain_id);

-- Address rewrites, independent of domains and users
CREATE TABLE aliases (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL,
    alias       TEXT NOT NULL,
    is_enabled  INTEGER NOT NULL DEFAULT 1,
    ctime       TEXT NOT NULL,
    mtime       TEXT NOT NULL,
    UNIQUE(email, alias)
);
"#,
];
