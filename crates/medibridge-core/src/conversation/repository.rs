//! ConversationStore trait definition.
//!
//! Append-only persistence for conversations and their message logs.
//! Follows the RPITIT pattern used for every port in this crate.

use medibridge_types::conversation::{Conversation, Message, NewMessage};
use medibridge_types::error::StoreError;
use uuid::Uuid;

/// Port for the document store holding conversations and their messages.
///
/// Implementations live in medibridge-infra (e.g., `SqliteConversationStore`).
/// Messages are never updated or deleted through this trait, and the store
/// (not the caller) assigns each message's sequence number and timestamp.
pub trait ConversationStore: Send + Sync {
    /// Create a conversation with a fresh id, the current time and an empty
    /// summary.
    fn create_conversation(
        &self,
    ) -> impl std::future::Future<Output = Result<Conversation, StoreError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, StoreError>> + Send;

    /// Append a message to a conversation's log.
    ///
    /// Returns the stored message with its assigned id, `seq` and timestamp.
    /// Fails with `StoreError::NotFound` when the conversation does not exist.
    fn append_message(
        &self,
        conversation_id: &Uuid,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// List all conversations, newest first.
    fn list_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, StoreError>> + Send;

    /// Load a conversation's messages in store order (oldest first).
    ///
    /// An unknown conversation id yields an empty list, not an error.
    fn load_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;
}
