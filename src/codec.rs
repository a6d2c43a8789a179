//! The two supported wire variants of X.690.

/// Selects which X.690 encoding variant the TLV codec (`crate::ber`) should
/// apply. Primitive, constructed, and model encode/decode all take a
/// `Codec` so the same type graph can serialize to either rule set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Codec {
    /// X.690 Basic Encoding Rules — permits indefinite length on decode
    /// detection (but not indefinite-length decoding itself, see
    /// `spec.md` §1 Non-goals), otherwise identical framing to DER.
    Ber,
    /// X.690 Distinguished Encoding Rules — rejects indefinite length
    /// outright.
    Der,
}

impl Codec {
    pub fn is_der(self) -> bool {
        matches!(self, Codec::Der)
    }

    pub fn is_ber(self) -> bool {
        matches!(self, Codec::Ber)
    }
}

impl core::fmt::Display for Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Codec::Ber => write!(f, "BER"),
            Codec::Der => write!(f, "DER"),
        }
    }
}
