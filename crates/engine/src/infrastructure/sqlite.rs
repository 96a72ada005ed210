//! SQLite-backed local cache: generated images, NPC conversations and the
//! per-session progress mirror.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use chronoquest_domain::ProgressSnapshot;
use chronoquest_shared::ImageRecord;

use crate::infrastructure::ports::{
    ClockPort, ConversationRecord, ConversationRepo, ImageCacheRepo, NewImageRecord, ProgressRepo,
    RepoError,
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS images (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        prompt      TEXT NOT NULL,
        prompt_hash TEXT NOT NULL UNIQUE,
        r2_key      TEXT,
        public_url  TEXT NOT NULL,
        model       TEXT,
        chapter_id  TEXT,
        scene_id    TEXT,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_images_chapter ON images (chapter_id);
    CREATE TABLE IF NOT EXISTS conversations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        chapter_id  TEXT NOT NULL,
        npc_name    TEXT NOT NULL,
        user_msg    TEXT NOT NULL,
        npc_reply   TEXT NOT NULL,
        model       TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_conversations_npc ON conversations (chapter_id, npc_name);
    CREATE TABLE IF NOT EXISTS progress (
        session_id  TEXT PRIMARY KEY,
        data        TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
"#;

/// SQLite implementation of the engine's local cache ports.
pub struct SqliteCache {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteCache {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RepoError::database("open", e))?;
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("open", e))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;

        Ok(Self { pool, clock })
    }

    async fn count_rows(&self, table: &'static str) -> Result<u64, RepoError> {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("count", e))?;
        let n: i64 = row.get("n");
        Ok(n.max(0) as u64)
    }
}

fn image_from_row(row: &SqliteRow) -> ImageRecord {
    ImageRecord {
        id: row.get("id"),
        prompt_hash: row.get("prompt_hash"),
        prompt: row.get("prompt"),
        chapter_id: row.get("chapter_id"),
        scene_id: row.get("scene_id"),
        r2_key: row.get("r2_key"),
        url: row.get("public_url"),
        model: row.get("model"),
        created_at: row.get("created_at"),
    }
}

// =============================================================================
// Image Cache
// =============================================================================

#[async_trait]
impl ImageCacheRepo for SqliteCache {
    async fn find_by_hash(&self, prompt_hash: &str) -> Result<Option<ImageRecord>, RepoError> {
        let row = sqlx::query("SELECT * FROM images WHERE prompt_hash = ? LIMIT 1")
            .bind(prompt_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("find_image", e))?;
        Ok(row.as_ref().map(image_from_row))
    }

    async fn insert(&self, record: NewImageRecord) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO images (prompt, prompt_hash, r2_key, public_url, model, chapter_id, scene_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(prompt_hash) DO NOTHING
            "#,
        )
        .bind(&record.prompt)
        .bind(&record.prompt_hash)
        .bind(&record.r2_key)
        .bind(&record.url)
        .bind(&record.model)
        .bind(&record.chapter_id)
        .bind(&record.scene_id)
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_image", e))?;
        Ok(())
    }

    async fn list(
        &self,
        chapter_id: Option<String>,
        limit: u32,
    ) -> Result<Vec<ImageRecord>, RepoError> {
        let rows = match chapter_id {
            Some(chapter_id) => {
                sqlx::query(
                    "SELECT * FROM images WHERE chapter_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(chapter_id)
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM images ORDER BY created_at DESC, id DESC LIMIT ?")
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| RepoError::database("list_images", e))?;

        Ok(rows.iter().map(image_from_row).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.count_rows("images").await
    }
}

// =============================================================================
// Conversations
// =============================================================================

#[async_trait]
impl ConversationRepo for SqliteCache {
    async fn recent(
        &self,
        chapter_id: &str,
        npc_name: &str,
        limit: u32,
    ) -> Result<Vec<ConversationRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT chapter_id, npc_name, user_msg, npc_reply, model FROM conversations
            WHERE chapter_id = ? AND npc_name = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(chapter_id)
        .bind(npc_name)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("recent_conversations", e))?;

        Ok(rows
            .iter()
            .map(|row| ConversationRecord {
                chapter_id: row.get("chapter_id"),
                npc_name: row.get("npc_name"),
                user_msg: row.get("user_msg"),
                npc_reply: row.get("npc_reply"),
                model: row.get("model"),
            })
            .collect())
    }

    async fn record(&self, record: ConversationRecord) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (chapter_id, npc_name, user_msg, npc_reply, model, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.chapter_id)
        .bind(&record.npc_name)
        .bind(&record.user_msg)
        .bind(&record.npc_reply)
        .bind(&record.model)
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("record_conversation", e))?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.count_rows("conversations").await
    }
}

// =============================================================================
// Progress Mirror
// =============================================================================

#[async_trait]
impl ProgressRepo for SqliteCache {
    async fn save(&self, session_id: &str, snapshot: &ProgressSnapshot) -> Result<(), RepoError> {
        let json = serde_json::to_string(snapshot).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO progress (session_id, data, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(json)
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_progress", e))?;

        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<ProgressSnapshot>, RepoError> {
        let row = sqlx::query("SELECT data FROM progress WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_progress", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("data");
                let snapshot = serde_json::from_str(&json).map_err(RepoError::serialization)?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }
}
