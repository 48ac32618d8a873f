//! Alias document codecs
//!
//! A codec translates between the persisted alias document and [`Alias`]
//! records. The registry only depends on the [`AliasCodec`] trait; the XML
//! format written by earlier releases is provided by [`XmlAliasCodec`].

mod xml;

pub use xml::{XmlAliasCodec, ALIASES_TAG, ALIAS_TAG};

use crate::error::CodecResult;
use crate::models::Alias;

/// An alias element that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    /// Zero-based position among the alias elements of the document
    pub index: usize,
    /// Human-readable reason the element was rejected
    pub reason: String,
}

impl SkippedElement {
    /// Creates a new skipped element entry
    #[must_use]
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

/// Result of decoding an alias document
///
/// Individual element failures do not abort decoding; they are collected
/// in `skipped` while the remaining elements are returned in `aliases`.
#[derive(Debug, Default)]
pub struct DecodedAliases {
    /// Successfully decoded aliases, in document order
    pub aliases: Vec<Alias>,
    /// Elements that were rejected
    pub skipped: Vec<SkippedElement>,
}

/// Translates alias documents to and from [`Alias`] records
pub trait AliasCodec: Send + Sync {
    /// Encodes the given aliases as a complete document
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be produced.
    fn encode(&self, aliases: &[&Alias]) -> CodecResult<String>;

    /// Decodes a complete document
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::RootMismatch`] if the root element is not the
    /// aliases collection, or [`CodecError::Malformed`] if the document is
    /// not well-formed. Invalid alias elements are reported in
    /// [`DecodedAliases::skipped`] instead.
    ///
    /// [`CodecError::RootMismatch`]: crate::error::CodecError::RootMismatch
    /// [`CodecError::Malformed`]: crate::error::CodecError::Malformed
    fn decode(&self, content: &str) -> CodecResult<DecodedAliases>;
}
