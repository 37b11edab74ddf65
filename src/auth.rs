//! Session lookup behind the external identity provider. Sign-in and account management
//! stay with the provider; this side only verifies the access tokens it issues.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience claim carried by the provider's user access tokens.
pub const TOKEN_AUDIENCE: &str = "authenticated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Also the profile id.
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token does not describe a live session.
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    exp: i64,
}

/// Verifies HS256 access tokens with the provider's shared secret.
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        JwtIdentityProvider {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        let data = match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "rejected access token");
                return Ok(None);
            }
        };
        let claims = data.claims;
        Ok(Some(Session {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub(crate) const SECRET: &str = "test-secret";

    pub(crate) fn token_for(user_id: Uuid, secret: &str, aud: &str, exp_offset_secs: i64) -> String {
        let claims = json!({
            "sub": user_id,
            "email": "ann@example.com",
            "role": "authenticated",
            "aud": aud,
            "exp": Utc::now().timestamp() + exp_offset_secs,
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_session() {
        let id = Uuid::new_v4();
        let provider = JwtIdentityProvider::new(SECRET);
        let session = provider
            .get_session(&token_for(id, SECRET, TOKEN_AUDIENCE, 3600))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.email.as_deref(), Some("ann@example.com"));
        assert!(session.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn wrong_secret_audience_or_expiry_is_no_session() {
        let id = Uuid::new_v4();
        let provider = JwtIdentityProvider::new(SECRET);
        for token in [
            token_for(id, "other-secret", TOKEN_AUDIENCE, 3600),
            token_for(id, SECRET, "anon", 3600),
            token_for(id, SECRET, TOKEN_AUDIENCE, -3600),
            "not.a.jwt".to_string(),
        ] {
            assert!(provider.get_session(&token).await.unwrap().is_none());
        }
    }
}
