//! Order dialogue module for handling conversation state with users.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::errors::NameError;

/// Longest accepted customer name, in characters
pub const MAX_NAME_CHARS: usize = 100;

/// Represents the conversation state of one user's order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDialogueState {
    #[default]
    Idle,
    WaitingForName,
    WaitingForContact {
        pending_name: String,
        user_id: i64,
    },
}

impl OrderDialogueState {
    /// Name collected so far, present only while waiting for the contact
    pub fn pending_name(&self) -> Option<&str> {
        match self {
            OrderDialogueState::WaitingForContact { pending_name, .. } => Some(pending_name),
            _ => None,
        }
    }
}

/// Validates a customer name input
///
/// The raw text is checked; the trimmed text is returned for storage.
pub fn validate_name(name: &str) -> Result<String, NameError> {
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(NameError::TooLong);
    }

    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(NameError::ContainsDigit);
    }

    Ok(name.trim().to_string())
}

/// In-memory dialogue storage, keyed by the user's private chat
pub type OrderStorage = InMemStorage<OrderDialogueState>;

/// Type alias for our order dialogue
pub type OrderDialogue = Dialogue<OrderDialogueState, OrderStorage>;

/// Current state of a dialogue; a dialogue without a stored entry is idle
pub async fn current_state(dialogue: &OrderDialogue) -> Result<OrderDialogueState> {
    Ok(dialogue.get().await?.unwrap_or_default())
}

/// Store `state`. Returning to idle removes the stored entry instead of keeping it.
pub async fn set_state(dialogue: &OrderDialogue, state: OrderDialogueState) -> Result<()> {
    if state == OrderDialogueState::Idle {
        if dialogue.get().await?.is_some() {
            dialogue.exit().await?;
        }
    } else {
        dialogue.update(state).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use teloxide::types::ChatId;

    #[test]
    fn test_name_validation() {
        // Valid names
        assert!(validate_name("Anna").is_ok());
        assert!(validate_name("  O'Neil Jr.  ").is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_CHARS)).is_ok());

        // Invalid names
        assert_eq!(validate_name("Anna2"), Err(NameError::ContainsDigit));
        assert_eq!(validate_name("0"), Err(NameError::ContainsDigit));
        assert_eq!(
            validate_name(&"a".repeat(MAX_NAME_CHARS + 1)),
            Err(NameError::TooLong)
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 100 Cyrillic letters are 200 bytes but still a valid name
        let name = "Ж".repeat(MAX_NAME_CHARS);
        assert_eq!(validate_name(&name), Ok(name.clone()));
    }

    #[test]
    fn test_name_trimming() {
        assert_eq!(validate_name("  Anna  ").unwrap(), "Anna");
    }

    fn dialogue(storage: &Arc<OrderStorage>) -> OrderDialogue {
        OrderDialogue::new(storage.clone(), ChatId(7))
    }

    #[tokio::test]
    async fn test_missing_dialogue_is_idle() -> Result<()> {
        let storage = OrderStorage::new();
        assert_eq!(current_state(&dialogue(&storage)).await?, OrderDialogueState::Idle);
        Ok(())
    }

    #[tokio::test]
    async fn test_idle_removes_stored_dialogue() -> Result<()> {
        let storage = OrderStorage::new();
        let dialogue = dialogue(&storage);

        set_state(&dialogue, OrderDialogueState::WaitingForName).await?;
        assert_eq!(dialogue.get().await?, Some(OrderDialogueState::WaitingForName));

        set_state(&dialogue, OrderDialogueState::Idle).await?;
        assert_eq!(dialogue.get().await?, None);

        // Resetting an already idle user is a no-op
        set_state(&dialogue, OrderDialogueState::Idle).await?;
        assert_eq!(dialogue.get().await?, None);
        Ok(())
    }
}
