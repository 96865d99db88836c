use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::user::UserType;

/// Tokens are valid for 7 days, matching the demo's session length.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub user_type: UserType,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing/verification keys derived from the configured secret.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, id: i64, user_type: UserType) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            id,
            user_type,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AppError::Internal(format!("failed to sign token: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::{Claims, JwtKeys, TOKEN_TTL_DAYS};
    use crate::models::user::UserType;

    #[test]
    fn sign_then_verify_roundtrips_claims() {
        let keys = JwtKeys::new("test-secret");
        let token = keys.sign(42, UserType::Admin).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.user_type, UserType::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = JwtKeys::new("test-secret");
        let token = keys.sign(1, UserType::Driver).unwrap();

        let other = JwtKeys::new("another-secret");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 7,
            user_type: UserType::Driver,
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let keys = JwtKeys::new("test-secret");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = JwtKeys::new("test-secret");
        assert!(keys.verify("not-a-jwt").is_err());
    }
}
