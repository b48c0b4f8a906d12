//! Authentication types for the domain layer.
//!
//! A staff member is identified by a validated bearer token. The token is
//! issued elsewhere; the `SessionValidator` port turns it into an
//! `AuthenticatedUser` carrying the staff role used by lifecycle policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::StaffId;

/// Staff roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Receptionist,
    Supervisor,
    Admin,
}

impl StaffRole {
    /// True for roles allowed to cancel and reopen bookings.
    pub fn is_elevated(&self) -> bool {
        matches!(self, StaffRole::Supervisor | StaffRole::Admin)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StaffRole::Receptionist => "receptionist",
            StaffRole::Supervisor => "supervisor",
            StaffRole::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StaffRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receptionist" => Ok(StaffRole::Receptionist),
            "supervisor" => Ok(StaffRole::Supervisor),
            "admin" => Ok(StaffRole::Admin),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

/// Authenticated staff member extracted from a validated JWT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: StaffId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: StaffRole,

    /// Bypasses role checks, like a framework superuser.
    pub is_superuser: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: StaffId,
        email: impl Into<String>,
        display_name: Option<String>,
        role: StaffRole,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            role,
            is_superuser: false,
        }
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Supervisor, Admin, or superuser.
    pub fn is_elevated(&self) -> bool {
        self.is_superuser || self.role.is_elevated()
    }

    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role == StaffRole::Admin
    }

    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(role: StaffRole) -> AuthenticatedUser {
        AuthenticatedUser::new(StaffId::new("staff-1").unwrap(), "front@goldenbay.ph", None, role)
    }

    #[test]
    fn only_supervisor_and_admin_are_elevated() {
        assert!(!staff(StaffRole::Receptionist).is_elevated());
        assert!(staff(StaffRole::Supervisor).is_elevated());
        assert!(staff(StaffRole::Admin).is_elevated());
    }

    #[test]
    fn superuser_is_elevated_regardless_of_role() {
        let user = staff(StaffRole::Receptionist).superuser();
        assert!(user.is_elevated());
        assert!(user.is_admin());
    }

    #[test]
    fn supervisor_is_not_admin() {
        assert!(!staff(StaffRole::Supervisor).is_admin());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Supervisor".parse::<StaffRole>(), Ok(StaffRole::Supervisor));
        assert_eq!(" ADMIN ".parse::<StaffRole>(), Ok(StaffRole::Admin));
        assert!("waiter".parse::<StaffRole>().is_err());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StaffRole::Receptionist).unwrap(),
            "\"receptionist\""
        );
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(staff(StaffRole::Admin).display_name_or_email(), "front@goldenbay.ph");
    }

    #[test]
    fn service_unavailable_carries_message() {
        assert_eq!(
            AuthError::service_unavailable("jwks down").to_string(),
            "Auth service unavailable: jwks down"
        );
    }
}
