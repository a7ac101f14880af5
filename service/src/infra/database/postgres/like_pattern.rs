//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// SQL `LIKE` pattern matching any value containing a literal term.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Escape character of a [`LikePattern`].
    pub const ESCAPE: char = '\\';

    /// Creates a new [`LikePattern`] matching any value containing the given
    /// `term` literally.
    ///
    /// Wildcards (`%`, `_`) and the [`LikePattern::ESCAPE`] character are
    /// escaped in the `term`.
    #[must_use]
    pub fn containing(term: &str) -> Self {
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | Self::ESCAPE) {
                pattern.push(Self::ESCAPE);
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}
