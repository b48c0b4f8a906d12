//! HS256 staff session tokens.
//!
//! Tokens are signed with a shared secret by the staff portal. The claims
//! carry the staff id in `sub`, plus `email`, `name`, `role` and an optional
//! `is_superuser` flag.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, StaffId, StaffRole};
use crate::ports::SessionValidator;

#[derive(Debug, Serialize, Deserialize)]
struct StaffClaims {
    sub: String,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    role: String,
    #[serde(default)]
    is_superuser: bool,
}

pub struct JwtSessionValidator {
    secret: SecretString,
    issuer: Option<String>,
    audience: Option<String>,
    leeway_secs: u64,
}

impl JwtSessionValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: SecretString::new(config.jwt_secret.clone()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            leeway_secs: config.leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let claims = decode::<StaffClaims>(token, &key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("staff token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!(error = %e, "staff token rejected");
                    AuthError::InvalidToken
                }
            })?
            .claims;

        let id = StaffId::new(&claims.sub).map_err(|_| {
            tracing::warn!("staff token has blank subject");
            AuthError::InvalidToken
        })?;
        let role: StaffRole = claims.role.parse().map_err(|e| {
            tracing::warn!(role = %claims.role, "staff token has unknown role");
            e
        })?;

        let user = AuthenticatedUser::new(id, claims.email.unwrap_or_default(), claims.name, role);
        Ok(if claims.is_superuser { user.superuser() } else { user })
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-test-secret-test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            ..Default::default()
        }
    }

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn valid_token_yields_staff_member() {
        let validator = JwtSessionValidator::new(&config());
        let t = token(json!({
            "sub": "staff-7",
            "exp": in_one_hour(),
            "email": "lea@goldenbay.com.ph",
            "name": "Lea",
            "role": "supervisor",
        }));

        let user = validator.validate(&t).await.unwrap();

        assert_eq!(user.id.as_str(), "staff-7");
        assert_eq!(user.role, StaffRole::Supervisor);
        assert!(user.is_elevated());
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn superuser_flag_is_honoured() {
        let validator = JwtSessionValidator::new(&config());
        let t = token(json!({
            "sub": "owner",
            "exp": in_one_hour(),
            "role": "receptionist",
            "is_superuser": true,
        }));

        let user = validator.validate(&t).await.unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let validator = JwtSessionValidator::new(&config());
        let t = token(json!({
            "sub": "staff-7",
            "exp": chrono::Utc::now().timestamp() - 3600,
            "role": "admin",
        }));

        assert_eq!(validator.validate(&t).await.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_role_are_invalid() {
        let validator = JwtSessionValidator::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..Default::default()
        });
        let t = token(json!({"sub": "s", "exp": in_one_hour(), "role": "admin"}));
        assert_eq!(validator.validate(&t).await.unwrap_err(), AuthError::InvalidToken);

        let validator = JwtSessionValidator::new(&config());
        let t = token(json!({"sub": "s", "exp": in_one_hour(), "role": "chef"}));
        assert_eq!(validator.validate(&t).await.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn issuer_is_checked_when_configured() {
        let validator = JwtSessionValidator::new(&AuthConfig {
            issuer: Some("goldenbay-portal".to_string()),
            ..config()
        });
        let wrong = token(json!({"sub": "s", "exp": in_one_hour(), "role": "admin", "iss": "elsewhere"}));
        let right = token(json!({"sub": "s", "exp": in_one_hour(), "role": "admin", "iss": "goldenbay-portal"}));

        assert!(validator.validate(&wrong).await.is_err());
        assert!(validator.validate(&right).await.is_ok());
    }
}
