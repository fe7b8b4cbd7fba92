//! Comment trivia lookup
//!
//! Fallthrough suppression is lexical, not syntactic: the analyzer only
//! needs the comment physically nearest before a label position. The
//! lookup is kept behind a narrow trait so an embedding front end can
//! substitute its own scanner (and its own comment syntaxes).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::SourceRange;

/// The marker token recognized as a fallthrough suppression comment
pub const FALLTHROUGH_MARKER: &str = "$FALL-THROUGH$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentForm {
    Line,
    Block,
}

/// A single comment with its body text (delimiters stripped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub form: CommentForm,
    pub range: SourceRange,
}

impl Comment {
    pub fn line(text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            text: text.into(),
            form: CommentForm::Line,
            range,
        }
    }

    pub fn block(text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            text: text.into(),
            form: CommentForm::Block,
            range,
        }
    }
}

/// Side-channel lookup of the nearest comment preceding a position
pub trait TriviaProvider {
    fn nearest_preceding_comment(&self, position: u32) -> Option<&Comment>;
}

/// Trivia provider backed by the scanner's comment list
#[derive(Debug, Default)]
pub struct SourceComments {
    comments: Vec<Comment>,
}

impl SourceComments {
    pub fn new(mut comments: Vec<Comment>) -> Self {
        comments.sort_by_key(|c| c.range.start);
        Self { comments }
    }
}

impl TriviaProvider for SourceComments {
    fn nearest_preceding_comment(&self, position: u32) -> Option<&Comment> {
        let idx = self.comments.partition_point(|c| c.range.end <= position);
        idx.checked_sub(1).map(|i| &self.comments[i])
    }
}

/// Provider for sources with no comments at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoComments;

impl TriviaProvider for NoComments {
    fn nearest_preceding_comment(&self, _position: u32) -> Option<&Comment> {
        None
    }
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Whether a comment body is exactly the suppression marker, after
/// collapsing whitespace and ignoring case.
pub fn is_suppression_marker(text: &str, marker: &str) -> bool {
    let normalized = WHITESPACE.replace_all(text.trim(), " ");
    normalized.eq_ignore_ascii_case(marker)
}
