use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AppError, AuthError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User id
    pub exp: i64,    // Expiration time
    pub jti: String, // Unique token id
}

/// A freshly issued access/refresh pair. The refresh expiry is carried
/// alongside so the store can persist it without re-decoding the token.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Creates and validates signed session tokens. Validation is stateless:
/// no store lookup is needed to accept an access token. Refresh tokens
/// get an additional store check in the session manager so they can be
/// revoked before their natural expiry.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| AppError::ConfigError(format!("unknown algorithm {}", config.algorithm)))?;

        // Keys are derived from a shared secret, which only works for the
        // HMAC family
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::ConfigError(format!(
                "unsupported signing algorithm {}",
                config.algorithm
            )));
        }

        let secret = config.secret_key.expose_secret().as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expire_days),
        })
    }

    /// Issue an access/refresh pair for a subject as of `now`.
    pub fn issue(&self, user_id: i32, now: DateTime<Utc>) -> Result<TokenPair, AppError> {
        let access_token = self.sign(user_id, now + self.access_ttl)?;
        let refresh_expires_at = now + self.refresh_ttl;
        let refresh_token = self.sign(user_id, refresh_expires_at)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at,
        })
    }

    fn sign(&self, user_id: i32, expires_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            // Distinguishes tokens minted for the same subject within the
            // same second, otherwise rotation could re-issue an identical
            // refresh token
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AppError::InternalError(format!("token signing failed: {}", e)))
    }

    /// Decode a token and return its subject. Any failure (bad signature,
    /// malformed token, past expiry) is an authentication failure; the
    /// internal variant only matters for logging.
    pub fn decode(&self, token: &str) -> Result<i32, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        data.claims
            .sub
            .parse::<i32>()
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Lifetime of issued access tokens in seconds, as reported to
    /// clients in `expires_in`.
    pub fn access_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;

    fn codec() -> TokenCodec {
        TokenCodec::from_config(&AuthConfig {
            secret_key: SecretString::new("test_secret"),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 15,
            refresh_token_expire_days: 7,
        })
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_subject() {
        let codec = codec();
        let pair = codec.issue(42, Utc::now()).unwrap();

        assert_eq!(codec.decode(&pair.access_token).unwrap(), 42);
        assert_eq!(codec.decode(&pair.refresh_token).unwrap(), 42);
        assert!(pair.refresh_expires_at > Utc::now());
    }

    #[test]
    fn test_access_and_refresh_have_distinct_lifetimes() {
        let codec = codec();
        let now = Utc::now();
        let pair = codec.issue(1, now).unwrap();

        assert_eq!(pair.refresh_expires_at, now + Duration::days(7));
        assert_eq!(codec.access_expires_in(), 15 * 60);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_same_second_tokens_differ() {
        let codec = codec();
        let now = Utc::now();
        let a = codec.issue(1, now).unwrap();
        let b = codec.issue(1, now).unwrap();

        assert_ne!(a.refresh_token, b.refresh_token);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        let pair = codec.issue(1, Utc::now() - Duration::days(30)).unwrap();

        assert!(matches!(
            codec.decode(&pair.refresh_token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = codec();
        let pair = codec.issue(1, Utc::now()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('A');
        assert!(codec.decode(&tampered).is_err());

        assert!(codec.decode("not.a.token").is_err());
        assert!(codec.decode("").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = codec();
        let other = TokenCodec::from_config(&AuthConfig {
            secret_key: SecretString::new("different_secret"),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 15,
            refresh_token_expire_days: 7,
        })
        .unwrap();

        let pair = codec.issue(1, Utc::now()).unwrap();
        assert!(other.decode(&pair.access_token).is_err());
    }

    #[test]
    fn test_non_hmac_algorithm_rejected_at_construction() {
        let result = TokenCodec::from_config(&AuthConfig {
            secret_key: SecretString::new("s"),
            algorithm: "RS256".to_string(),
            access_token_expire_minutes: 15,
            refresh_token_expire_days: 7,
        });
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
