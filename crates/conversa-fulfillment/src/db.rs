use rusqlite::Connection;

/// Initialise the SMS usage table. Safe to call on every startup
/// (idempotent), matching the teacher's `skynet-memory::db::init_db`
/// convention.
pub fn init_sms_usage_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sms_usage (
            tenant_id   TEXT NOT NULL,
            month       TEXT NOT NULL,
            count       INTEGER NOT NULL DEFAULT 0,
            updated_at  TEXT NOT NULL,
            PRIMARY KEY (tenant_id, month)
        );",
    )
}
