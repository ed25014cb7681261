//! Inbox service
//!
//! Conversation listing, thread retrieval, and outbound sending for a
//! user's assigned provider number.

use chrono::Utc;
use tracing::{instrument, warn};
use uuid::Uuid;

use courier_core::{
    conversation_messages, group_conversations, DomainError, PhoneNumber, ReadStateMap,
};
use courier_provider::MessageFilter;

use crate::dto::{ConversationResponse, MarkReadResponse, MessageResponse, ReadStateResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Inbox service
pub struct InboxService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InboxService<'a> {
    /// Create a new InboxService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Grouped conversation summaries for a user, newest first.
    ///
    /// Read-state loading fails softly: with the store unavailable every
    /// received message counts unread, which is always safe to display.
    #[instrument(skip(self))]
    pub async fn conversations(&self, user_id: Uuid) -> ServiceResult<Vec<ConversationResponse>> {
        let own = self.assigned_number(user_id).await?;
        let messages = self
            .ctx
            .provider()
            .list_messages(&own, MessageFilter::All)
            .await?;

        let read_states = self.load_read_states(user_id).await;
        let conversations = group_conversations(&messages, Some(&own), &read_states);

        Ok(conversations
            .iter()
            .map(|c| ConversationResponse {
                counterparty: c.counterparty.as_str().to_string(),
                last_message: MessageResponse::from(c.last_message()),
                unread_count: c.unread_count,
            })
            .collect())
    }

    /// One conversation's messages, oldest first
    #[instrument(skip(self))]
    pub async fn conversation_messages(
        &self,
        user_id: Uuid,
        counterparty: &PhoneNumber,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let own = self.assigned_number(user_id).await?;
        let messages = self
            .ctx
            .provider()
            .list_messages(&own, MessageFilter::All)
            .await?;

        let thread = conversation_messages(&messages, counterparty, Some(&own));
        Ok(thread.iter().map(MessageResponse::from).collect())
    }

    /// Gateway side of the mark-as-read contract: upsert the read marker
    /// for the pair at the server clock and echo what the store recorded.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        counterparty: &PhoneNumber,
    ) -> ServiceResult<MarkReadResponse> {
        if user_id.is_nil() {
            return Err(DomainError::MissingArgument("userId").into());
        }

        let now = Utc::now();
        let state = self
            .ctx
            .read_state_repo()
            .upsert(user_id, counterparty, now)
            .await?;

        Ok(MarkReadResponse {
            success: true,
            phone_number: state.phone_number.as_str().to_string(),
            last_read_at: state.last_read_at.unwrap_or(now),
        })
    }

    /// All stored read markers for a user
    #[instrument(skip(self))]
    pub async fn read_states(&self, user_id: Uuid) -> ServiceResult<Vec<ReadStateResponse>> {
        let states = self.ctx.read_state_repo().find_all_for_user(user_id).await?;
        Ok(states
            .into_iter()
            .map(|s| ReadStateResponse {
                phone_number: s.phone_number.into_inner(),
                last_read_at: s.last_read_at,
            })
            .collect())
    }

    /// Send an outbound message from the user's assigned number
    #[instrument(skip(self, body))]
    pub async fn send_message(
        &self,
        user_id: Uuid,
        to: &str,
        body: &str,
    ) -> ServiceResult<MessageResponse> {
        if body.trim().is_empty() {
            return Err(ServiceError::validation("Message body is required"));
        }
        let to = PhoneNumber::parse(to).map_err(DomainError::from)?;
        let own = self.assigned_number(user_id).await?;

        let message = self.ctx.provider().send_message(&own, &to, body).await?;
        Ok(MessageResponse::from(&message))
    }

    /// The provider number the user works from; absent assignment is a
    /// not-found error since the inbox has nothing to show without one.
    async fn assigned_number(&self, user_id: Uuid) -> ServiceResult<PhoneNumber> {
        let assignment = self
            .ctx
            .assignment_repo()
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::AssignmentNotFound(user_id))?;
        Ok(assignment.phone_number)
    }

    async fn load_read_states(&self, user_id: Uuid) -> ReadStateMap {
        match self.ctx.read_state_repo().find_all_for_user(user_id).await {
            Ok(states) => ReadStateMap::from_states(states),
            Err(e) => {
                warn!(error = %e, "Failed to load read states, defaulting to unread");
                ReadStateMap::new()
            }
        }
    }
}
