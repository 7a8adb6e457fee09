//! Process-local adapter implementing every driven port.
//!
//! All state sits behind one mutex and each port call is a single critical
//! section, so multi-record writes (follow changes, completion plus
//! successor) are all-or-nothing exactly like their database counterparts.
//! Used in development mode and by the HTTP integration tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    NotificationRepository, NotificationRepositoryError, PostRepository, PostRepositoryError,
    ReminderRepository, ReminderRepositoryError, TokenVerifier, TokenVerifierError,
    UserRepository, UserRepositoryError, token_fingerprint,
};
use crate::domain::{
    AuthorProjection, CompletionChange, FollowChange, Notification, Post, PostId, Reminder,
    ReminderId, UserId, UserProfile,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserProfile>,
    tokens: HashMap<String, UserId>,
    // Vectors keep insertion order, used as the tie-breaker when sorting.
    posts: Vec<Post>,
    reminders: Vec<Reminder>,
    notifications: Vec<Notification>,
}

/// In-memory store shared by all in-memory port implementations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user record as the identity service would.
    pub fn seed_user(&self, profile: UserProfile) {
        self.state().users.insert(profile.id, profile);
    }

    /// Register a bearer token for `user`. Only its fingerprint is kept.
    pub fn issue_token(&self, user: UserId, token: &str) {
        self.state().tokens.insert(token_fingerprint(token), user);
    }

    /// Snapshot of a user record.
    pub fn user(&self, id: &UserId) -> Option<UserProfile> {
        self.state().users.get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(self.user(id))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_projections(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, AuthorProjection>, UserRepositoryError> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|user| (user.id, user.projection()))
            .collect())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let stored = state
            .users
            .get_mut(&profile.id)
            .ok_or_else(|| UserRepositoryError::query("user not found for update"))?;
        stored.name.clone_from(&profile.name);
        stored.bio.clone_from(&profile.bio);
        stored.interests.clone_from(&profile.interests);
        stored.profile_image_ref.clone_from(&profile.profile_image_ref);
        Ok(())
    }

    async fn apply_follow_change(&self, change: &FollowChange) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let mut follower = state
            .users
            .get(&change.follower)
            .cloned()
            .ok_or_else(|| UserRepositoryError::query("follower not found"))?;
        let mut followee = state
            .users
            .get(&change.followee)
            .cloned()
            .ok_or_else(|| UserRepositoryError::query("followee not found"))?;
        follower.apply_follow_change(change);
        followee.apply_follow_change(change);
        state.users.insert(follower.id, follower);
        state.users.insert(followee.id, followee);
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for MemoryStore {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        Ok(self.state().tokens.get(&token_fingerprint(token)).copied())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.state().posts.iter().find(|p| p.id() == *id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let mut posts: Vec<Post> = self.state().posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(posts)
    }

    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        if state.posts.iter().any(|p| p.id() == post.id()) {
            return Err(PostRepositoryError::query("duplicate post id"));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn save(&self, post: &Post, expected_revision: u32) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        let stored = state
            .posts
            .iter_mut()
            .find(|p| p.id() == post.id())
            .ok_or_else(|| PostRepositoryError::query("post not found for update"))?;
        if stored.revision() != expected_revision {
            return Err(PostRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = post.clone();
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut state = self.state();
        let before = state.posts.len();
        state.posts.retain(|p| p.id() != *id);
        Ok(state.posts.len() != before)
    }
}

#[async_trait]
impl ReminderRepository for MemoryStore {
    async fn find_by_id(&self, id: &ReminderId) -> Result<Option<Reminder>, ReminderRepositoryError> {
        Ok(self.state().reminders.iter().find(|r| r.id == *id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Reminder>, ReminderRepositoryError> {
        let mut reminders: Vec<Reminder> = self
            .state()
            .reminders
            .iter()
            .filter(|r| r.owner_id == *owner)
            .cloned()
            .collect();
        reminders.sort_by_key(|r| r.due_at);
        Ok(reminders)
    }

    async fn insert(&self, reminder: &Reminder) -> Result<(), ReminderRepositoryError> {
        let mut state = self.state();
        if state.reminders.iter().any(|r| r.id == reminder.id) {
            return Err(ReminderRepositoryError::query("duplicate reminder id"));
        }
        state.reminders.push(reminder.clone());
        Ok(())
    }

    async fn apply_completion(
        &self,
        change: &CompletionChange,
        expected_revision: u32,
    ) -> Result<(), ReminderRepositoryError> {
        let mut state = self.state();
        let stored = state
            .reminders
            .iter_mut()
            .find(|r| r.id == change.reminder.id)
            .ok_or_else(|| ReminderRepositoryError::query("reminder not found for update"))?;
        if stored.revision != expected_revision {
            return Err(ReminderRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision,
            ));
        }
        *stored = change.reminder.clone();
        if let Some(successor) = &change.successor {
            state.reminders.push(successor.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &ReminderId) -> Result<bool, ReminderRepositoryError> {
        let mut state = self.state();
        let before = state.reminders.len();
        state.reminders.retain(|r| r.id != *id);
        Ok(state.reminders.len() != before)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.state().notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for_receiver(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut notifications: Vec<Notification> = self
            .state()
            .notifications
            .iter()
            .rev()
            .filter(|n| n.receiver_id == *receiver)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}
