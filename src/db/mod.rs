use crate::models::{
    ParticipantStatus, PollResponse, ResponseKind, SharedPoll, StatementResponse, SubmissionReceipt, Topic,
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, migrate::MigrateDatabase};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to encode or decode stored JSON: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub struct Database {
    pool: SqlitePool,
    // Held by every writer. A deferred transaction that reads and then writes
    // fails with SQLITE_BUSY if another connection commits in between.
    write_lock: Mutex<()>,
}

// Fixed-width so MAX() over the text column orders chronologically.
fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp '{}': {}", raw, e)))
}

fn poll_not_found(poll_id: &str) -> StoreError {
    StoreError::NotFound(format!("Poll '{}' not found", poll_id))
}

fn response_from_row(row: &SqliteRow) -> Result<PollResponse, StoreError> {
    let response_str = row.get::<String, _>("response");
    let response = ResponseKind::parse(&response_str)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown response '{}'", response_str)))?;
    let statement_index = row.get::<i64, _>("statement_index");

    Ok(PollResponse {
        poll_id: row.get("poll_id"),
        participant_name: row.get("participant_name"),
        statement_index: usize::try_from(statement_index)
            .map_err(|_| StoreError::Corrupt(format!("negative statement index {}", statement_index)))?,
        response,
        timestamp: decode_time(&row.get::<String, _>("timestamp"))?,
        participant_session_id: row.get("participant_session_id"),
    })
}

impl Database {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;
        info!("Connected to poll store at {}", db_url);

        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS polls (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                main_theme TEXT NOT NULL,
                statements TEXT NOT NULL,
                expected_clusters TEXT NOT NULL,
                metadata TEXT NOT NULL,
                created_at TEXT NOT NULL,
                creator_name TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS poll_responses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                poll_id TEXT NOT NULL,
                participant_name TEXT,
                statement_index INTEGER NOT NULL,
                response TEXT NOT NULL CHECK (response IN ('agree', 'disagree', 'skip')),
                timestamp TEXT NOT NULL,
                participant_session_id TEXT NOT NULL,
                FOREIGN KEY (poll_id) REFERENCES polls(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_poll_responses_poll ON poll_responses (poll_id)")
            .execute(pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_poll_responses_participant ON poll_responses (poll_id, participant_name)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Stores `topic` under a fresh identifier.
    pub async fn save_poll(&self, topic: &Topic, creator_name: Option<String>) -> Result<SharedPoll, StoreError> {
        let poll = SharedPoll::new(topic.clone(), creator_name);
        let _guard = self.write_lock.lock().await;

        sqlx::query(
            r#"
            INSERT INTO polls (id, title, description, main_theme, statements, expected_clusters, metadata, created_at, creator_name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&poll.poll_id)
        .bind(&poll.topic.title)
        .bind(&poll.topic.description)
        .bind(&poll.topic.main_theme)
        .bind(serde_json::to_string(&poll.topic.statements)?)
        .bind(serde_json::to_string(&poll.topic.expected_clusters)?)
        .bind(serde_json::to_string(&poll.topic.metadata)?)
        .bind(encode_time(poll.created_at))
        .bind(&poll.creator_name)
        .execute(&self.pool)
        .await?;

        info!("Saved poll {} ({})", poll.poll_id, poll.topic.title);
        Ok(poll)
    }

    pub async fn get_poll(&self, poll_id: &str) -> Result<SharedPoll, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, main_theme, statements, expected_clusters, metadata, created_at, creator_name
            FROM polls
            WHERE id = ?
            "#,
        )
        .bind(poll_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| poll_not_found(poll_id))?;

        let topic = Topic {
            title: row.get("title"),
            description: row.get("description"),
            main_theme: row.get("main_theme"),
            statements: serde_json::from_str(&row.get::<String, _>("statements"))?,
            expected_clusters: serde_json::from_str(&row.get::<String, _>("expected_clusters"))?,
            metadata: serde_json::from_str(&row.get::<String, _>("metadata"))?,
        };

        Ok(SharedPoll {
            poll_id: row.get("id"),
            topic,
            created_at: decode_time(&row.get::<String, _>("created_at"))?,
            creator_name: row.get("creator_name"),
        })
    }

    async fn ensure_poll_exists(&self, poll_id: &str) -> Result<(), StoreError> {
        sqlx::query("SELECT 1 FROM polls WHERE id = ?")
            .bind(poll_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| poll_not_found(poll_id))
    }

    /// Records one submission. A named participant who already answered has
    /// their most recent session replaced; anonymous submissions always add a
    /// new session.
    pub async fn submit_responses(
        &self,
        poll_id: &str,
        participant_name: Option<&str>,
        responses: &[StatementResponse],
    ) -> Result<SubmissionReceipt, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let poll_exists = sqlx::query("SELECT 1 FROM polls WHERE id = ?")
            .bind(poll_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !poll_exists {
            return Err(poll_not_found(poll_id));
        }

        let mut is_retake = false;
        if let Some(name) = participant_name {
            let prior_session: Option<String> = sqlx::query_scalar(
                r#"
                SELECT participant_session_id
                FROM poll_responses
                WHERE poll_id = ? AND participant_name = ?
                ORDER BY id DESC
                LIMIT 1
                "#,
            )
            .bind(poll_id)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(session_id) = prior_session {
                let deleted = sqlx::query("DELETE FROM poll_responses WHERE poll_id = ? AND participant_session_id = ?")
                    .bind(poll_id)
                    .bind(&session_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                info!(
                    "Retake by '{}' on poll {}: replaced {} responses from session {}",
                    name, poll_id, deleted, session_id
                );
                is_retake = true;
            }
        }

        let session_id = Uuid::new_v4().to_string();
        let timestamp = encode_time(Utc::now());
        for entry in responses {
            sqlx::query(
                r#"
                INSERT INTO poll_responses (poll_id, participant_name, statement_index, response, timestamp, participant_session_id)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(poll_id)
            .bind(participant_name)
            .bind(entry.statement_index as i64)
            .bind(entry.response.as_str())
            .bind(&timestamp)
            .bind(&session_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(SubmissionReceipt {
            session_id,
            responses_saved: responses.len(),
            is_retake,
        })
    }

    /// Counts every stored row for the name, across all of its sessions.
    pub async fn participant_status(&self, poll_id: &str, participant_name: &str) -> Result<ParticipantStatus, StoreError> {
        self.ensure_poll_exists(poll_id).await?;

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS response_count, MAX(timestamp) AS last_taken
            FROM poll_responses
            WHERE poll_id = ? AND participant_name = ?
            "#,
        )
        .bind(poll_id)
        .bind(participant_name)
        .fetch_one(&self.pool)
        .await?;

        let response_count = row.get::<i64, _>("response_count");
        let last_taken = row
            .get::<Option<String>, _>("last_taken")
            .map(|raw| decode_time(&raw))
            .transpose()?;

        Ok(ParticipantStatus {
            has_responded: response_count > 0,
            response_count,
            last_taken,
        })
    }

    /// All responses for a poll, oldest first.
    pub async fn get_poll_responses(&self, poll_id: &str) -> Result<Vec<PollResponse>, StoreError> {
        sqlx::query(
            r#"
            SELECT poll_id, participant_name, statement_index, response, timestamp, participant_session_id
            FROM poll_responses
            WHERE poll_id = ?
            ORDER BY id
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(response_from_row)
        .collect()
    }

    /// Responses from the participant's most recent session; empty if they never answered.
    pub async fn get_latest_session(&self, poll_id: &str, participant_name: &str) -> Result<Vec<PollResponse>, StoreError> {
        sqlx::query(
            r#"
            SELECT poll_id, participant_name, statement_index, response, timestamp, participant_session_id
            FROM poll_responses
            WHERE participant_session_id = (
                SELECT participant_session_id
                FROM poll_responses
                WHERE poll_id = ? AND participant_name = ?
                ORDER BY id DESC
                LIMIT 1
            )
            ORDER BY id
            "#,
        )
        .bind(poll_id)
        .bind(participant_name)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(response_from_row)
        .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::DomainCatalog;
    use crate::topics::assembler::assemble;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    pub(crate) async fn test_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("polls.db").display());
        let db = Database::new(&url, 5).await.unwrap();
        (db, dir)
    }

    pub(crate) fn demo_topic() -> Topic {
        assemble(&DomainCatalog::builtin(), "housing", "Testville", 5, "en").unwrap()
    }

    fn answers(kinds: &[ResponseKind]) -> Vec<StatementResponse> {
        kinds
            .iter()
            .enumerate()
            .map(|(statement_index, response)| StatementResponse { statement_index, response: *response })
            .collect()
    }

    fn sessions(responses: &[PollResponse]) -> HashSet<String> {
        responses.iter().map(|r| r.participant_session_id.clone()).collect()
    }

    #[tokio::test]
    async fn saved_poll_reads_back_intact() {
        let (db, _dir) = test_db().await;
        let topic = demo_topic();
        let saved = db.save_poll(&topic, Some("  Maya ".into())).await.unwrap();

        let loaded = db.get_poll(&saved.poll_id).await.unwrap();
        assert_eq!(loaded.topic, topic);
        assert_eq!(loaded.creator_name.as_deref(), Some("Maya"));
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn poll_ids_are_unique() {
        let (db, _dir) = test_db().await;
        let topic = demo_topic();
        let mut ids = HashSet::new();
        for _ in 0..25 {
            ids.insert(db.save_poll(&topic, None).await.unwrap().poll_id);
        }
        assert_eq!(ids.len(), 25);
    }

    #[tokio::test]
    async fn missing_poll_is_not_found() {
        let (db, _dir) = test_db().await;
        assert!(matches!(db.get_poll("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            db.submit_responses("nope", None, &answers(&[ResponseKind::Agree])).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(db.participant_status("nope", "x").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn named_retake_replaces_the_previous_session() {
        let (db, _dir) = test_db().await;
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        let first = db
            .submit_responses(&poll.poll_id, Some("Sam"), &answers(&[ResponseKind::Agree, ResponseKind::Agree]))
            .await
            .unwrap();
        assert!(!first.is_retake);
        assert_eq!(first.responses_saved, 2);

        let second = db
            .submit_responses(
                &poll.poll_id,
                Some("Sam"),
                &answers(&[ResponseKind::Disagree, ResponseKind::Skip, ResponseKind::Agree]),
            )
            .await
            .unwrap();
        assert!(second.is_retake);
        assert_ne!(first.session_id, second.session_id);

        let stored = db.get_poll_responses(&poll.poll_id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(sessions(&stored), HashSet::from([second.session_id.clone()]));
        assert_eq!(stored[0].response, ResponseKind::Disagree);
    }

    #[tokio::test]
    async fn anonymous_submissions_accumulate() {
        let (db, _dir) = test_db().await;
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        for _ in 0..2 {
            let receipt = db
                .submit_responses(&poll.poll_id, None, &answers(&[ResponseKind::Agree]))
                .await
                .unwrap();
            assert!(!receipt.is_retake);
        }

        let stored = db.get_poll_responses(&poll.poll_id).await.unwrap();
        assert_eq!(sessions(&stored).len(), 2);
    }

    #[tokio::test]
    async fn retake_leaves_other_participants_alone() {
        let (db, _dir) = test_db().await;
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        db.submit_responses(&poll.poll_id, Some("Ana"), &answers(&[ResponseKind::Agree])).await.unwrap();
        db.submit_responses(&poll.poll_id, Some("Ben"), &answers(&[ResponseKind::Agree])).await.unwrap();
        db.submit_responses(&poll.poll_id, None, &answers(&[ResponseKind::Agree])).await.unwrap();
        db.submit_responses(&poll.poll_id, Some("Ana"), &answers(&[ResponseKind::Skip])).await.unwrap();

        let stored = db.get_poll_responses(&poll.poll_id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(sessions(&stored).len(), 3);
    }

    #[tokio::test]
    async fn concurrent_retakes_leave_one_session() {
        let (db, _dir) = test_db().await;
        let db = Arc::new(db);
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let db = Arc::clone(&db);
                let poll_id = poll.poll_id.clone();
                tokio::spawn(async move {
                    db.submit_responses(&poll_id, Some("Kim"), &answers(&[ResponseKind::Agree, ResponseKind::Skip]))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = db.get_poll_responses(&poll.poll_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(sessions(&stored).len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn submissions_survive_concurrent_poll_saves() {
        let (db, _dir) = test_db().await;
        let db = Arc::new(db);
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let db = Arc::clone(&db);
                let poll_id = poll.poll_id.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        db.save_poll(&demo_topic(), None).await.map(|_| ())
                    } else {
                        let name = format!("voter-{}", i % 10);
                        db.submit_responses(&poll_id, Some(&name), &answers(&[ResponseKind::Agree]))
                            .await
                            .map(|_| ())
                    }
                })
            })
            .collect();

        let mut failures = Vec::new();
        for handle in handles {
            if let Err(e) = handle.await.unwrap() {
                failures.push(e.to_string());
            }
        }
        assert!(failures.is_empty(), "{:?}", failures);

        // Five distinct names, each left with exactly its latest session.
        let stored = db.get_poll_responses(&poll.poll_id).await.unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(sessions(&stored).len(), 5);
    }

    #[tokio::test]
    async fn participant_status_counts_rows_for_the_name() {
        let (db, _dir) = test_db().await;
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        let before = db.participant_status(&poll.poll_id, "Lee").await.unwrap();
        assert!(!before.has_responded);
        assert_eq!(before.response_count, 0);
        assert!(before.last_taken.is_none());

        db.submit_responses(
            &poll.poll_id,
            Some("Lee"),
            &answers(&[ResponseKind::Agree, ResponseKind::Disagree, ResponseKind::Skip]),
        )
        .await
        .unwrap();

        let after = db.participant_status(&poll.poll_id, "Lee").await.unwrap();
        assert!(after.has_responded);
        assert_eq!(after.response_count, 3);
        assert!(after.last_taken.is_some());
    }

    #[tokio::test]
    async fn latest_session_returns_only_the_newest_batch() {
        let (db, _dir) = test_db().await;
        let poll = db.save_poll(&demo_topic(), None).await.unwrap();

        assert!(db.get_latest_session(&poll.poll_id, "Jo").await.unwrap().is_empty());

        db.submit_responses(&poll.poll_id, Some("Jo"), &answers(&[ResponseKind::Agree])).await.unwrap();
        let retake = db
            .submit_responses(&poll.poll_id, Some("Jo"), &answers(&[ResponseKind::Disagree, ResponseKind::Agree]))
            .await
            .unwrap();

        let latest = db.get_latest_session(&poll.poll_id, "Jo").await.unwrap();
        assert_eq!(latest.len(), 2);
        assert!(latest.iter().all(|r| r.participant_session_id == retake.session_id));
    }
}
