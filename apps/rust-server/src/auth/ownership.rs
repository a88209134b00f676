// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership checks for account-scoped operations.
//!
//! A caller may only modify a resource whose owner id equals the `id` claim
//! of its verified token.

use super::{AuthError, Claims};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_id(&self) -> &str;
}

/// A path parameter naming an account is owned by that account.
impl OwnedResource for str {
    fn owner_id(&self) -> &str {
        self
    }
}

impl OwnedResource for String {
    fn owner_id(&self) -> &str {
        self
    }
}

/// Trait for enforcing ownership before a mutation.
pub trait OwnershipEnforcer {
    /// Verify that the caller owns this resource.
    ///
    /// # Errors
    /// Returns [`AuthError::Forbidden`] carrying `denial` if it doesn't.
    fn verify_ownership(&self, claims: &Claims, denial: &str) -> Result<(), AuthError>;
}

impl<T: OwnedResource + ?Sized> OwnershipEnforcer for T {
    fn verify_ownership(&self, claims: &Claims, denial: &str) -> Result<(), AuthError> {
        if self.owner_id() == claims.id {
            Ok(())
        } else {
            tracing::debug!(
                caller = %claims.id,
                owner = %self.owner_id(),
                "Ownership check failed"
            );
            Err(AuthError::Forbidden(denial.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Video {
        user_id: String,
    }

    impl OwnedResource for Video {
        fn owner_id(&self) -> &str {
            &self.user_id
        }
    }

    #[test]
    fn owner_passes() {
        let video = Video {
            user_id: "user_123".to_string(),
        };
        assert!(video
            .verify_ownership(&Claims::for_user("user_123"), "not yours")
            .is_ok());
    }

    #[test]
    fn non_owner_gets_the_denial_message() {
        let video = Video {
            user_id: "user_123".to_string(),
        };
        let err = video
            .verify_ownership(&Claims::for_user("user_456"), "You can update only your video!")
            .unwrap_err();
        assert!(
            matches!(&err, AuthError::Forbidden(msg) if msg == "You can update only your video!")
        );
    }

    #[test]
    fn path_ids_compare_exactly() {
        let claims = Claims::for_user("abc");
        assert!("abc".verify_ownership(&claims, "no").is_ok());
        assert!("ABC".verify_ownership(&claims, "no").is_err());
        assert!(String::from("abc ").verify_ownership(&claims, "no").is_err());
    }
}
