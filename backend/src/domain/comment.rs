//! Comment aggregate and its value objects.
//!
//! A [`Comment`] belongs to exactly one post and one author. Its identifier,
//! post, author snapshot, and creation time never change; only the body and
//! `updated_at` move, and only through [`Comment::with_body`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::User;

/// Longest identifier accepted for comments and posts.
pub const MAX_ID_LENGTH: usize = 128;

/// Longest comment body, counted in characters.
pub const MAX_BODY_LENGTH: usize = 4000;

/// Validation errors for comment identifiers and content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentValidationError {
    #[error("{field} must not be empty")]
    EmptyId { field: &'static str },
    #[error("{field} must not contain surrounding whitespace")]
    PaddedId { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    IdTooLong { field: &'static str, max: usize },
    #[error("comment body must not be empty")]
    EmptyBody,
    #[error("comment body must be at most {max} characters")]
    BodyTooLong { max: usize },
}

fn validate_opaque_id(raw: &str, field: &'static str) -> Result<(), CommentValidationError> {
    if raw.is_empty() {
        return Err(CommentValidationError::EmptyId { field });
    }
    if raw.trim() != raw {
        return Err(CommentValidationError::PaddedId { field });
    }
    if raw.chars().count() > MAX_ID_LENGTH {
        return Err(CommentValidationError::IdTooLong {
            field,
            max: MAX_ID_LENGTH,
        });
    }
    Ok(())
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, CommentValidationError> {
                let raw = raw.into();
                validate_opaque_id(&raw, $field)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $name {
            type Error = CommentValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

opaque_id!(
    /// Opaque comment identifier assigned by the service at creation time.
    CommentId,
    "comment_id"
);

opaque_id!(
    /// Opaque identifier of the post that owns a comment.
    PostId,
    "post_id"
);

impl CommentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Free-text comment content.
///
/// ## Invariants
/// - Not blank once trimmed; stored verbatim otherwise.
/// - At most [`MAX_BODY_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate and construct a comment body.
    ///
    /// # Examples
    /// ```
    /// use post_comments::domain::CommentBody;
    ///
    /// assert!(CommentBody::new("hi").is_ok());
    /// assert!(CommentBody::new("  ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, CommentValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        if raw.chars().count() > MAX_BODY_LENGTH {
            return Err(CommentValidationError::BodyTooLong {
                max: MAX_BODY_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Borrow the body text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for CommentBody {
    type Error = CommentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommentBody> for String {
    fn from(value: CommentBody) -> Self {
        value.0
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user: User,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Build a fresh comment with `created_at == updated_at == now`.
    pub fn new(
        id: CommentId,
        post_id: PostId,
        user: User,
        body: CommentBody,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            user,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the body, advancing `updated_at` without moving it backwards.
    pub fn with_body(mut self, body: CommentBody, now: DateTime<Utc>) -> Self {
        self.body = body;
        self.updated_at = now.max(self.updated_at);
        self
    }

    /// Whether `user` wrote this comment.
    pub fn is_authored_by(&self, user: super::UserId) -> bool {
        self.user.id == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn comment(created_at: DateTime<Utc>) -> Comment {
        Comment::new(
            CommentId::new("C1").expect("valid id"),
            PostId::new("P1").expect("valid id"),
            User::new(UserId::new(9).expect("valid user"), "Ann"),
            CommentBody::new("hello").expect("valid body"),
            created_at,
        )
    }

    #[rstest]
    #[case("", CommentValidationError::EmptyId { field: "comment_id" })]
    #[case(" C1", CommentValidationError::PaddedId { field: "comment_id" })]
    fn rejects_malformed_comment_ids(#[case] raw: &str, #[case] expected: CommentValidationError) {
        assert_eq!(CommentId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_post_ids() {
        let raw = "p".repeat(MAX_ID_LENGTH + 1);
        assert_eq!(
            PostId::new(raw),
            Err(CommentValidationError::IdTooLong {
                field: "post_id",
                max: MAX_ID_LENGTH,
            })
        );
    }

    #[rstest]
    fn generated_ids_are_unique() {
        assert_ne!(CommentId::generate(), CommentId::generate());
    }

    #[rstest]
    #[case("", CommentValidationError::EmptyBody)]
    #[case(" \n\t", CommentValidationError::EmptyBody)]
    fn rejects_blank_bodies(#[case] raw: &str, #[case] expected: CommentValidationError) {
        assert_eq!(CommentBody::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_bodies() {
        let raw = "x".repeat(MAX_BODY_LENGTH + 1);
        assert_eq!(
            CommentBody::new(raw),
            Err(CommentValidationError::BodyTooLong {
                max: MAX_BODY_LENGTH
            })
        );
    }

    #[rstest]
    fn bodies_are_stored_verbatim() {
        let body = CommentBody::new("  padded  ").expect("valid body");
        assert_eq!(body.as_str(), "  padded  ");
    }

    #[rstest]
    fn new_comment_has_matching_timestamps(comment: Comment, created_at: DateTime<Utc>) {
        assert_eq!(comment.created_at, created_at);
        assert_eq!(comment.updated_at, created_at);
    }

    #[rstest]
    fn with_body_preserves_identity_and_advances_updated_at(
        comment: Comment,
        created_at: DateTime<Utc>,
    ) {
        let later = created_at + Duration::minutes(5);
        let edited = comment
            .clone()
            .with_body(CommentBody::new("edited").expect("valid body"), later);

        assert_eq!(edited.id, comment.id);
        assert_eq!(edited.post_id, comment.post_id);
        assert_eq!(edited.user, comment.user);
        assert_eq!(edited.created_at, created_at);
        assert_eq!(edited.updated_at, later);
        assert_eq!(edited.body.as_str(), "edited");
    }

    #[rstest]
    fn with_body_never_moves_updated_at_backwards(comment: Comment, created_at: DateTime<Utc>) {
        let earlier = created_at - Duration::minutes(5);
        let edited = comment.with_body(CommentBody::new("edited").expect("valid body"), earlier);
        assert_eq!(edited.updated_at, created_at);
    }

    #[rstest]
    fn authorship_compares_user_ids(comment: Comment) {
        assert!(comment.is_authored_by(UserId::new(9).expect("valid user")));
        assert!(!comment.is_authored_by(UserId::new(7).expect("valid user")));
    }
}
