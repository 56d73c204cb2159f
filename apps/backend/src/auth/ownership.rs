//! Ownership rule for mutating resources.
//!
//! A subject may update or delete a resource iff it is the recorded owner.
//! Callers load the resource first, so a missing resource reports not-found
//! before ownership is ever considered.

use uuid::Uuid;

use super::AuthError;
use crate::extractors::current_user::CurrentUser;
use crate::logging::security;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// A resource with an immutable owner.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
    /// Short label for security logs, e.g. `post:<id>`.
    fn resource_label(&self) -> String;
}

pub fn authorize(subject: Uuid, owner: Uuid) -> Access {
    if subject == owner {
        Access::Allowed
    } else {
        Access::Denied
    }
}

pub fn require_owner<R: Owned + ?Sized>(identity: &CurrentUser, resource: &R) -> Result<(), AuthError> {
    match authorize(identity.id, resource.owner_id()) {
        Access::Allowed => Ok(()),
        Access::Denied => {
            security::access_denied(&identity.id.to_string(), &resource.resource_label());
            Err(AuthError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    struct Thing {
        owner: Uuid,
    }

    impl Owned for Thing {
        fn owner_id(&self) -> Uuid {
            self.owner
        }
        fn resource_label(&self) -> String {
            "thing".to_string()
        }
    }

    fn identity(id: Uuid) -> CurrentUser {
        CurrentUser {
            id,
            email: "a@x.com".to_string(),
            fullname: "A".to_string(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn owner_may_mutate() {
        let id = Uuid::new_v4();
        assert!(require_owner(&identity(id), &Thing { owner: id }).is_ok());
    }

    #[test]
    fn non_owner_is_unauthorized() {
        let err = require_owner(
            &identity(Uuid::new_v4()),
            &Thing {
                owner: Uuid::new_v4(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    proptest! {
        #[test]
        fn allowed_iff_ids_equal(a in any::<u128>(), b in any::<u128>()) {
            let (a, b) = (Uuid::from_u128(a), Uuid::from_u128(b));
            prop_assert_eq!(authorize(a, a), Access::Allowed);
            prop_assert_eq!(authorize(a, b) == Access::Allowed, a == b);
        }
    }
}
