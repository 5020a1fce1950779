//! Access rules for galleries. Both checks run after the gallery has been
//! loaded, so a missing gallery is reported as not found before any of these
//! are consulted.

use crate::error::AppError;
use crate::models::{Gallery, User};

/// Only the owner may pass. Used by every mutating gallery or image action.
pub fn must_own_gallery(user: Option<&User>, gallery: &Gallery) -> Result<(), AppError> {
    match user {
        Some(user) if user.id == gallery.user_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "You are not authorized to edit this gallery.".to_string(),
        )),
    }
}

/// Published galleries are open to everyone, drafts only to their owner.
pub fn must_own_or_public_gallery(user: Option<&User>, gallery: &Gallery) -> Result<(), AppError> {
    if gallery.published {
        return Ok(());
    }
    match user {
        Some(user) if user.id == gallery.user_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "You are not authorized to view this gallery.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn gallery(owner: i64, published: bool) -> Gallery {
        Gallery {
            id: 7,
            user_id: owner,
            title: "Holiday".to_string(),
            published,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn owner_passes_both_checks() {
        let a = user(1);
        for published in [false, true] {
            let g = gallery(1, published);
            assert!(must_own_gallery(Some(&a), &g).is_ok());
            assert!(must_own_or_public_gallery(Some(&a), &g).is_ok());
        }
    }

    #[test]
    fn draft_is_private_to_owner() {
        let b = user(2);
        let g = gallery(1, false);
        assert!(matches!(
            must_own_or_public_gallery(Some(&b), &g),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            must_own_or_public_gallery(None, &g),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(must_own_gallery(Some(&b), &g), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn publishing_opens_viewing_but_not_editing() {
        let b = user(2);
        let g = gallery(1, true);
        assert!(must_own_or_public_gallery(Some(&b), &g).is_ok());
        assert!(must_own_or_public_gallery(None, &g).is_ok());
        assert!(matches!(must_own_gallery(Some(&b), &g), Err(AppError::Forbidden(_))));
        assert!(matches!(must_own_gallery(None, &g), Err(AppError::Forbidden(_))));
    }
}
