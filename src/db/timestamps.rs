//! Creation/modification timestamps.
//!
//! Repositories call [`Timestamps::on_insert`] when creating a row and
//! [`Timestamps::on_update`] when modifying one; nothing in the schema fills
//! these columns implicitly.

use chrono::{DateTime, SubsecRound, Utc};

/// The `ctime`/`mtime` pair carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    /// When the row was inserted.
    pub ctime: DateTime<Utc>,
    /// When the row was last written.
    pub mtime: DateTime<Utc>,
}

impl Timestamps {
    /// Timestamps for a row being inserted now.
    pub fn on_insert() -> Self {
        let now = Self::now();
        Self {
            ctime: now,
            mtime: now,
        }
    }

    /// Modification time for a row being updated now.
    pub fn on_update() -> DateTime<Utc> {
        Self::now()
    }

    // Microsecond precision round-trips through SQLite TEXT unchanged.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_insert_sets_both() {
        let ts = Timestamps::on_insert();
        assert_eq!(ts.ctime, ts.mtime);
    }

    #[test]
    fn test_on_update_not_before_insert() {
        let ts = Timestamps::on_insert();
        let mtime = Timestamps::on_update();
        assert!(mtime >= ts.ctime);
    }

    #[test]
    fn test_microsecond_precision() {
        let ts = Timestamps::on_insert();
        assert_eq!(ts.ctime.timestamp_subsec_nanos() % 1_000, 0);
    }
}
