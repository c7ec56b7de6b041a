use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::db::init_sms_usage_db;

#[derive(Debug, Clone, Copy)]
pub struct UsageCheck {
    pub allowed: bool,
    pub usage_before: u32,
    pub usage_after: u32,
    pub limit: u32,
}

/// Per-tenant, per-calendar-month SMS counter (C11). Modeled on the
/// teacher's `MemoryManager`/`SessionManager` rusqlite pattern: a single
/// `Mutex<Connection>` with the atomic increment expressed as an
/// `INSERT ... ON CONFLICT DO UPDATE`, the rusqlite idiom for the upsert
/// the spec describes as `count = if_not_exists(count, 0) + 1`.
pub struct SmsUsageMeter {
    db: Mutex<Connection>,
}

impl SmsUsageMeter {
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        init_sms_usage_db(&conn)?;
        Ok(Self { db: Mutex::new(conn) })
    }

    /// `check_and_increment(tenant_id, monthly_limit) -> {allowed, usage_before,
    /// usage_after, limit}` (§4.11). On any read failure the meter fails open
    /// — storage issues never block SMS notifications — and logs a warning.
    pub fn check_and_increment(&self, tenant_id: &str, monthly_limit: u32) -> UsageCheck {
        let month = current_month();

        let conn = match self.db.lock() {
            Ok(c) => c,
            Err(e) => {
                warn!(tenant_id, error = %e, "sms usage db mutex poisoned; failing open");
                return fail_open(monthly_limit);
            }
        };

        let usage_before: u32 = match conn.query_row(
            "SELECT count FROM sms_usage WHERE tenant_id = ?1 AND month = ?2",
            params![tenant_id, month],
            |row| row.get(0),
        ) {
            Ok(count) => count,
            Err(rusqlite::Error::QueryReturnedNoRows) => 0,
            Err(e) => {
                warn!(tenant_id, month, error = %e, "sms usage read failed; failing open");
                return fail_open(monthly_limit);
            }
        };

        if usage_before >= monthly_limit {
            return UsageCheck {
                allowed: false,
                usage_before,
                usage_after: usage_before,
                limit: monthly_limit,
            };
        }

        let now = Utc::now().to_rfc3339();
        if let Err(e) = conn.execute(
            "INSERT INTO sms_usage (tenant_id, month, count, updated_at) VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(tenant_id, month) DO UPDATE SET count = count + 1, updated_at = excluded.updated_at",
            params![tenant_id, month, now],
        ) {
            warn!(tenant_id, month, error = %e, "sms usage increment failed");
            return UsageCheck {
                allowed: true,
                usage_before,
                usage_after: usage_before,
                limit: monthly_limit,
            };
        }

        UsageCheck {
            allowed: true,
            usage_before,
            usage_after: usage_before + 1,
            limit: monthly_limit,
        }
    }
}

fn fail_open(monthly_limit: u32) -> UsageCheck {
    UsageCheck {
        allowed: true,
        usage_before: 0,
        usage_after: 0,
        limit: monthly_limit,
    }
}

fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> SmsUsageMeter {
        let conn = Connection::open_in_memory().unwrap();
        SmsUsageMeter::new(conn).unwrap()
    }

    #[test]
    fn first_send_allowed_and_increments() {
        let m = meter();
        let check = m.check_and_increment("tenant-a", 100);
        assert!(check.allowed);
        assert_eq!(check.usage_before, 0);
        assert_eq!(check.usage_after, 1);
    }

    #[test]
    fn monotonic_across_sends() {
        let m = meter();
        for _ in 0..5 {
            m.check_and_increment("tenant-a", 100);
        }
        let check = m.check_and_increment("tenant-a", 100);
        assert_eq!(check.usage_before, 5);
        assert_eq!(check.usage_after, 6);
    }

    #[test]
    fn at_limit_is_skipped_without_incrementing() {
        let m = meter();
        for _ in 0..100 {
            m.check_and_increment("tenant-a", 100);
        }
        let check = m.check_and_increment("tenant-a", 100);
        assert!(!check.allowed);
        assert_eq!(check.usage_before, 100);
        assert_eq!(check.usage_after, 100);
        assert_eq!(check.limit, 100);
    }

    #[test]
    fn separate_tenants_dont_share_counters() {
        let m = meter();
        m.check_and_increment("tenant-a", 100);
        let check = m.check_and_increment("tenant-b", 100);
        assert_eq!(check.usage_before, 0);
    }
}
