use crate::db::UserStore;
use crate::types::{AppError, AuthError, Claims, Identity, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::Rng;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Random 256-bit secret, hex encoded (64 characters).
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Process-wide HS256 signing key.
///
/// The key material is derived from the configured secret on first use and
/// held for the life of the process. `OnceLock` guarantees that concurrent
/// first requests all observe the same instance.
pub struct SigningKey {
    secret: String,
    material: OnceLock<KeyMaterial>,
}

struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            material: OnceLock::new(),
        }
    }

    fn material(&self) -> &KeyMaterial {
        self.material.get_or_init(|| {
            debug!("Materializing token signing key");
            let bytes = self.secret.as_bytes();
            KeyMaterial {
                encoding: EncodingKey::from_secret(bytes),
                decoding: DecodingKey::from_secret(bytes),
            }
        })
    }

    /// Whether the key has been derived yet
    pub fn is_materialized(&self) -> bool {
        self.material.get().is_some()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

/// Issues and validates signed identity tokens.
///
/// Tokens are HS256 JWTs carrying the principal name, role list, user id and
/// an absolute expiry. Validation additionally requires the principal to
/// still exist in the user store, so deleting a user invalidates every
/// outstanding token without a revocation list.
pub struct TokenCodec {
    key: SigningKey,
    ttl: Duration,
    users: Arc<dyn UserStore>,
}

impl TokenCodec {
    /// Creates a codec.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (at least 32 bytes, checked by config validation)
    /// * `ttl_secs` - Token validity in seconds
    /// * `users` - Store consulted for the principal-exists check
    pub fn new(secret: impl Into<String>, ttl_secs: i64, users: Arc<dyn UserStore>) -> Self {
        Self {
            key: SigningKey::new(secret),
            // out-of-range TTLs are caught by the overflow check in `issue`
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
            users,
        }
    }

    /// Token validity in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    /// Signs a token for `identity` expiring at `now + ttl`.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::Internal(format!(
                "Token expiry overflows: ttl of {}s is out of range",
                self.ttl.num_seconds()
            ))
        })?;

        let claims = Claims {
            sub: identity.principal.clone(),
            username: identity.principal.clone(),
            role: identity.roles.clone(),
            user_id: identity.user_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.key.material().encoding,
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies the signature and structure of `token` and returns its claims.
    ///
    /// Expiry is not checked here; see [`TokenCodec::verify`].
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.key.material().decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature.into(),
                _ => AuthError::MalformedToken(e.to_string()).into(),
            })
    }

    /// Full check: signature, expiry against `now`, and principal existence.
    ///
    /// Fails with `Expired` or `PrincipalGone` for a structurally valid token
    /// that is no longer trusted.
    pub async fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let claims = self.decode(token)?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired.into());
        }

        // a user recreated under the same name gets a new id
        match self.users.find_by_username(&claims.username).await? {
            Some(user) if user.id == claims.user_id => {}
            _ => return Err(AuthError::PrincipalGone.into()),
        }

        Ok(claims)
    }

    /// Boolean form of [`TokenCodec::verify`].
    ///
    /// Expired tokens and vanished principals yield `Ok(false)`; signature and
    /// structural failures stay errors.
    pub async fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<bool> {
        match self.verify(token, now).await {
            Ok(_) => Ok(true),
            Err(AppError::Auth(AuthError::Expired | AuthError::PrincipalGone)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
