//! SQLite conversation store.
//!
//! Implements `ConversationStore` from `medibridge-core` with raw sqlx
//! queries, private Row structs and split reader/writer pool usage.

use chrono::{DateTime, Utc};
use medibridge_core::conversation::repository::ConversationStore;
use medibridge_types::conversation::{Conversation, Message, NewMessage};
use medibridge_types::error::StoreError;
use medibridge_types::language::{Language, Role};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationStore`.
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    created_at: String,
    summary: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            summary: row.try_get("summary")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, StoreError> {
        Ok(Conversation {
            id: parse_uuid(&self.id, "conversation id")?,
            created_at: parse_datetime(&self.created_at)?,
            summary: self.summary,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: String,
    seq: i64,
    role: String,
    original_text: String,
    translated_text: String,
    input_language: String,
    output_language: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            seq: row.try_get("seq")?,
            role: row.try_get("role")?,
            original_text: row.try_get("original_text")?,
            translated_text: row.try_get("translated_text")?,
            input_language: row.try_get("input_language")?,
            output_language: row.try_get("output_language")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, StoreError> {
        let role: Role = self.role.parse().map_err(StoreError::Query)?;
        let input_language: Language = self.input_language.parse().map_err(StoreError::Query)?;
        let output_language: Language =
            self.output_language.parse().map_err(StoreError::Query)?;

        Ok(Message {
            id: parse_uuid(&self.id, "message id")?,
            conversation_id: parse_uuid(&self.conversation_id, "conversation_id")?,
            seq: self.seq,
            role,
            original_text: self.original_text,
            translated_text: self.translated_text,
            input_language,
            output_language,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(s).map_err(|e| StoreError::Query(format!("invalid {what}: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Connection-level failures mean the store is unreachable; anything else is
/// a query problem.
fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ConversationStore implementation
// ---------------------------------------------------------------------------

impl ConversationStore for SqliteConversationStore {
    async fn create_conversation(&self) -> Result<Conversation, StoreError> {
        let conversation = Conversation {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            summary: String::new(),
        };

        sqlx::query("INSERT INTO conversations (id, created_at, summary) VALUES (?, ?, ?)")
            .bind(conversation.id.to_string())
            .bind(format_datetime(&conversation.created_at))
            .bind(&conversation.summary)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        tracing::debug!(conversation_id = %conversation.id, "Conversation row inserted");
        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query("SELECT id, created_at, summary FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => {
                let row = ConversationRow::from_row(&row).map_err(map_sqlx)?;
                Ok(Some(row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn append_message(
        &self,
        conversation_id: &Uuid,
        message: &NewMessage,
    ) -> Result<Message, StoreError> {
        let id = Uuid::now_v7();
        let timestamp = Utc::now();
        let conversation_key = conversation_id.to_string();

        // seq is computed inside the insert so it is assigned by the store;
        // the EXISTS guard turns an unknown conversation into zero rows.
        let seq: Option<i64> = sqlx::query_scalar(
            r#"INSERT INTO messages (id, conversation_id, seq, role, original_text,
                   translated_text, input_language, output_language, timestamp)
               SELECT ?, ?,
                   COALESCE((SELECT MAX(seq) FROM messages WHERE conversation_id = ?), 0) + 1,
                   ?, ?, ?, ?, ?, ?
               WHERE EXISTS (SELECT 1 FROM conversations WHERE id = ?)
               RETURNING seq"#,
        )
        .bind(id.to_string())
        .bind(&conversation_key)
        .bind(&conversation_key)
        .bind(message.role.to_string())
        .bind(&message.original_text)
        .bind(&message.translated_text)
        .bind(message.input_language.code())
        .bind(message.output_language.code())
        .bind(format_datetime(&timestamp))
        .bind(&conversation_key)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        let Some(seq) = seq else {
            return Err(StoreError::NotFound);
        };

        Ok(Message {
            id,
            conversation_id: *conversation_id,
            seq,
            role: message.role,
            original_text: message.original_text.clone(),
            translated_text: message.translated_text.clone(),
            input_language: message.input_language,
            output_language: message.output_language,
            timestamp,
        })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, created_at, summary FROM conversations ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|row| {
                ConversationRow::from_row(row)
                    .map_err(map_sqlx)?
                    .into_conversation()
            })
            .collect()
    }

    async fn load_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT id, conversation_id, seq, role, original_text, translated_text,
                   input_language, output_language, timestamp
               FROM messages
               WHERE conversation_id = ?
               ORDER BY seq ASC"#,
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|row| MessageRow::from_row(row).map_err(map_sqlx)?.into_message())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;

    async fn test_store() -> SqliteConversationStore {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        SqliteConversationStore::new(DatabasePool::new(&url).await.unwrap())
    }

    fn new_message(role: Role, text: &str) -> NewMessage {
        NewMessage {
            role,
            original_text: text.to_string(),
            translated_text: format!("translated: {text}"),
            input_language: Language::English,
            output_language: Language::ChineseSimplified,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_conversation() {
        let store = test_store().await;
        let created = store.create_conversation().await.unwrap();

        let fetched = store.get_conversation(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert!(fetched.summary.is_empty());
        assert_eq!(
            fetched.created_at.timestamp_micros(),
            created.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_get_unknown_conversation() {
        let store = test_store().await;
        assert!(store.get_conversation(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_seq() {
        let store = test_store().await;
        let conversation = store.create_conversation().await.unwrap();

        let first = store
            .append_message(&conversation.id, &new_message(Role::Doctor, "Hello"))
            .await
            .unwrap();
        let second = store
            .append_message(&conversation.id, &new_message(Role::Patient, "Namaste"))
            .await
            .unwrap();

        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_seq_is_per_conversation() {
        let store = test_store().await;
        let a = store.create_conversation().await.unwrap();
        let b = store.create_conversation().await.unwrap();

        store
            .append_message(&a.id, &new_message(Role::Doctor, "one"))
            .await
            .unwrap();
        let in_b = store
            .append_message(&b.id, &new_message(Role::Doctor, "two"))
            .await
            .unwrap();
        assert_eq!(in_b.seq, 1);
    }

    #[tokio::test]
    async fn test_append_to_unknown_conversation_is_not_found() {
        let store = test_store().await;
        let err = store
            .append_message(&Uuid::now_v7(), &new_message(Role::Doctor, "Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_load_messages_round_trips_fields_in_order() {
        let store = test_store().await;
        let conversation = store.create_conversation().await.unwrap();
        let mut appended = Vec::new();
        for (role, text) in [
            (Role::Doctor, "Where does it hurt?"),
            (Role::Patient, "Pet mein"),
            (Role::Doctor, "Since when?"),
        ] {
            appended.push(
                store
                    .append_message(&conversation.id, &new_message(role, text))
                    .await
                    .unwrap(),
            );
        }

        let loaded = store.load_messages(&conversation.id).await.unwrap();
        assert_eq!(loaded.len(), 3);
        for (stored, original) in loaded.iter().zip(&appended) {
            assert_eq!(stored.id, original.id);
            assert_eq!(stored.seq, original.seq);
            assert_eq!(stored.role, original.role);
            assert_eq!(stored.original_text, original.original_text);
            assert_eq!(stored.translated_text, original.translated_text);
            assert_eq!(stored.input_language, Language::English);
            assert_eq!(stored.output_language, Language::ChineseSimplified);
        }
    }

    #[tokio::test]
    async fn test_load_messages_unknown_conversation_is_empty() {
        let store = test_store().await;
        assert!(store.load_messages(&Uuid::now_v7()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_conversations_newest_first() {
        let store = test_store().await;
        assert!(store.list_conversations().await.unwrap().is_empty());

        let older = store.create_conversation().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = store.create_conversation().await.unwrap();

        let listed = store.list_conversations().await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_seq() {
        let store = test_store().await;
        let conversation = store.create_conversation().await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let id = conversation.id;
            handles.push(tokio::spawn(async move {
                store
                    .append_message(&id, &new_message(Role::Doctor, &format!("turn {i}")))
                    .await
                    .unwrap()
                    .seq
            }));
        }

        let mut seqs = Vec::new();
        for handle in handles {
            seqs.push(handle.await.unwrap());
        }
        seqs.sort();
        assert_eq!(seqs, (1..=8).collect::<Vec<i64>>());
    }
}
