//! Error types returned by the codec, type, and model layers.
//!
//! Encoding failures surface as [`EncodeError`], decoding failures as
//! [`DecodeError`]. Schema declaration mistakes (caught before any bytes are
//! produced or consumed) surface as [`ModelValidationError`]. Backtraces are
//! captured when the `backtraces` feature is enabled.

use snafu::{IntoError, Snafu};

use crate::tag::Tag;

/// Errors raised while turning a value into its DER/BER byte encoding.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EncodeError {
    /// A CHOICE was encoded without an alternative having been chosen.
    #[snafu(display("chosen alternative not set for CHOICE{}", name_suffix(name)))]
    ChosenNotSet { name: Option<String> },

    /// `class` option referred to a class outside universal, application,
    /// context, or private.
    #[snafu(display("invalid class value {value}"))]
    #[snafu(context(name(EncodeClassSnafu)))]
    Class { value: u8 },

    /// An Enumerated value had no entry in its name/value table.
    #[snafu(display("{value} is not a valid member of this ENUMERATED type"))]
    #[snafu(context(name(EncodeEnumeratedSnafu)))]
    Enumerated { value: i64 },

    /// A declared constraint (restricted-character-set, numeric range, ...)
    /// rejected a value on assignment.
    #[snafu(display("constraint violated{}: {reason}", name_suffix(name)))]
    #[snafu(context(name(EncodeConstraintSnafu)))]
    Constraint {
        name: Option<String>,
        reason: String,
    },

    /// Both `implicit` and `explicit` tagging were requested on one element.
    #[snafu(display("cannot set both implicit and explicit tagging{}", name_suffix(name)))]
    #[snafu(context(name(EncodeConfigurationSnafu)))]
    Configuration { name: Option<String> },

    /// Propagated from a named child element, with its name prepended for
    /// diagnostics.
    #[snafu(display("{name}: {source}"))]
    EncodeNested {
        name: String,
        #[snafu(source(from(EncodeError, Box::new)))]
        source: Box<EncodeError>,
    },
}

/// Errors raised while parsing DER/BER bytes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecodeError {
    /// The TLV framing itself was malformed: a truncated identifier, a
    /// truncated or invalid length, or content shorter than the declared
    /// length.
    #[snafu(display("malformed encoding: {reason}"))]
    Encoding { reason: String },

    /// A fixed-length or fixed-shape universal type received content of the
    /// wrong shape (NULL with non-empty content, a malformed BOOLEAN, ...).
    #[snafu(display("malformed content for tag {tag:?}: {reason}"))]
    MalformedContent { tag: Tag, reason: String },

    /// `class` option referred to a class outside universal, application,
    /// context, or private.
    #[snafu(display("invalid class value {value}"))]
    Class { value: u8 },

    /// A decoded Enumerated integer had no entry in its name/value table.
    #[snafu(display("{value} is not a valid member of this ENUMERATED type"))]
    Enumerated { value: i64 },

    /// No alternative of a non-optional CHOICE matched the upcoming
    /// identifier.
    #[snafu(display("no alternative of this CHOICE matches the encoded identifier"))]
    NoMatchingAlternative,

    /// A declared constraint rejected a decoded value.
    #[snafu(display("constraint violated{}: {reason}", name_suffix(name)))]
    Constraint {
        name: Option<String>,
        reason: String,
    },

    /// Both `implicit` and `explicit` tagging were requested on one element.
    #[snafu(display("cannot set both implicit and explicit tagging{}", name_suffix(name)))]
    Configuration { name: Option<String> },

    /// An indefinite length was encountered while decoding under DER.
    #[snafu(display("indefinite length is not permitted under DER"))]
    IndefiniteLengthUnderDer,

    /// An indefinite length was encountered while decoding under BER; this
    /// library can detect it but cannot decode it.
    #[snafu(display("indefinite length decoding is not implemented"))]
    NotImplemented,

    /// Propagated from a named child element, with its name prepended for
    /// diagnostics.
    #[snafu(display("{name}: {source}"))]
    DecodeNested {
        name: String,
        #[snafu(source(from(DecodeError, Box::new)))]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap `self` with the name of the element that was being decoded when
    /// the error occurred, for diagnostics.
    pub fn named(self, name: impl Into<String>) -> Self {
        DecodeNestedSnafu { name: name.into() }.into_error(self)
    }
}

impl EncodeError {
    /// Wrap `self` with the name of the element that was being encoded when
    /// the error occurred.
    pub fn named(self, name: impl Into<String>) -> Self {
        EncodeNestedSnafu { name: name.into() }.into_error(self)
    }
}

/// A schema-declaration-time error: a duplicate field name, a model
/// declared with contradictory options, etc. Distinct from [`EncodeError`]/
/// [`DecodeError`] because it can only ever occur once, at `Model` class
/// construction, never while encoding or decoding an instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ModelValidationError {
    /// Two sibling declarations in the same `content:` list used the same
    /// name.
    #[snafu(display("duplicate field name {name:?} in model declaration"))]
    DuplicateName { name: String },

    /// A wrapper or type declaration set both `implicit` and `explicit`.
    #[snafu(display("field {name:?} sets both implicit and explicit tagging"))]
    ContradictoryTagging { name: String },
}

fn name_suffix(name: &Option<String>) -> String {
    match name {
        Some(n) => format!(" ({n})"),
        None => String::new(),
    }
}
