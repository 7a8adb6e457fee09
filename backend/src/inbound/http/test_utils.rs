//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::UserId;
use crate::domain::ports::{
    MockNotificationsQuery, MockPostsCommand, MockPostsQuery, MockProfileCommand,
    MockProfileQuery, MockRelationshipCommand, MockRemindersCommand, MockRemindersQuery,
    MockTokenVerifier,
};

use super::state::HttpState;

pub const TEST_TOKEN: &str = "test-token";

/// A verifier that resolves every token to `user`.
pub fn verifier_for(user: UserId) -> MockTokenVerifier {
    let mut verifier = MockTokenVerifier::new();
    verifier.expect_verify().returning(move |_| Ok(Some(user)));
    verifier
}

/// Mocks for each port; unset ports panic if a handler reaches them.
#[derive(Default)]
pub struct TestPorts {
    pub tokens: MockTokenVerifier,
    pub posts: MockPostsCommand,
    pub posts_query: MockPostsQuery,
    pub relationships: MockRelationshipCommand,
    pub reminders: MockRemindersCommand,
    pub reminders_query: MockRemindersQuery,
    pub notifications: MockNotificationsQuery,
    pub profiles: MockProfileCommand,
    pub profiles_query: MockProfileQuery,
}

impl TestPorts {
    pub fn authenticated(user: UserId) -> Self {
        Self {
            tokens: verifier_for(user),
            ..Self::default()
        }
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            tokens: Arc::new(self.tokens),
            posts: Arc::new(self.posts),
            posts_query: Arc::new(self.posts_query),
            relationships: Arc::new(self.relationships),
            reminders: Arc::new(self.reminders),
            reminders_query: Arc::new(self.reminders_query),
            notifications: Arc::new(self.notifications),
            profiles: Arc::new(self.profiles),
            profiles_query: Arc::new(self.profiles_query),
        }
    }
}

pub fn state_with_tokens(tokens: MockTokenVerifier) -> HttpState {
    TestPorts {
        tokens,
        ..TestPorts::default()
    }
    .into_state()
}
