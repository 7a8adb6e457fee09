//! Bearer token lookup against the `access_tokens` table.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{TokenVerifier, TokenVerifierError, token_fingerprint};

use super::pool::DbPool;
use super::schema::access_tokens;

/// Resolves tokens by SHA-256 fingerprint; expired tokens do not resolve.
#[derive(Clone)]
pub struct DieselTokenVerifier {
    pool: DbPool,
}

impl DieselTokenVerifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenVerifier for DieselTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        let mut conn = self.pool.get().await.map_err(TokenVerifierError::from_store)?;

        let user: Option<Uuid> = access_tokens::table
            .filter(access_tokens::token_hash.eq(token_fingerprint(token)))
            .filter(
                access_tokens::expires_at
                    .is_null()
                    .or(access_tokens::expires_at.gt(Utc::now())),
            )
            .select(access_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(TokenVerifierError::from_store)?;

        Ok(user.map(UserId::from_uuid))
    }
}
