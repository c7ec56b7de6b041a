use std::sync::Mutex;

use async_trait::async_trait;
use conversa_core::model::FormSubmissionRecord;
use conversa_core::Result;
use rusqlite::{params, Connection};
use tracing::warn;

/// Persistence seam for submitted forms, analogous to the teacher's
/// `MemoryManager` trait over a rusqlite-backed store. Submission is
/// best-effort — a write failure does not fail the submit operation
/// (§4.9: "the record is persisted (failure non-fatal)").
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn save(&self, record: &FormSubmissionRecord) -> Result<()>;
}

pub fn init_submissions_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS form_submissions (
            submission_id TEXT PRIMARY KEY,
            tenant_id     TEXT NOT NULL,
            form_id       TEXT NOT NULL,
            form_data     TEXT NOT NULL,
            priority      TEXT NOT NULL,
            submitted_at  TEXT NOT NULL,
            status        TEXT NOT NULL
        );",
    )
}

/// Synchronous `rusqlite::Connection` behind a mutex, following the same
/// single-writer-connection convention as `SmsUsageMeter`.
pub struct SqliteSubmissionStore {
    db: Mutex<Connection>,
}

impl SqliteSubmissionStore {
    pub fn new(conn: Connection) -> rusqlite::Result<Self> {
        init_submissions_db(&conn)?;
        Ok(Self { db: Mutex::new(conn) })
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn save(&self, record: &FormSubmissionRecord) -> Result<()> {
        let form_data = serde_json::to_string(&record.form_data)?;
        let conn = self.db.lock().map_err(|e| conversa_core::GatewayError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO form_submissions
                (submission_id, tenant_id, form_id, form_data, priority, submitted_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(submission_id) DO UPDATE SET
                form_data = excluded.form_data,
                priority = excluded.priority,
                status = excluded.status",
            params![
                record.submission_id,
                record.tenant_id,
                record.form_id,
                form_data,
                record.priority,
                record.submitted_at,
                record.status,
            ],
        )
        .map_err(|e| conversa_core::GatewayError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Fire-and-log wrapper: submission persistence must never fail the
/// submit-form operation.
pub async fn save_best_effort(store: &dyn SubmissionStore, record: &FormSubmissionRecord) {
    if let Err(e) = store.save(record).await {
        warn!(submission_id = %record.submission_id, error = %e, "form submission persistence failed");
    }
}
