//! Signature input normalisation.
//!
//! Verification accepts signatures either as lowercase hex strings or as
//! raw byte buffers; both forms normalise to the same bytes before any
//! parsing happens.

use crate::errors::CryptoError;

/// A signature as presented at the verification boundary.
#[derive(Clone, Copy, Debug)]
pub enum SignatureInput<'a> {
    /// Hex-encoded signature string.
    Hex(&'a str),
    /// Raw signature bytes.
    Raw(&'a [u8]),
}

impl<'a> SignatureInput<'a> {
    /// Normalises the input to raw signature bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Hex(s) => hex::decode(s).map_err(|_| CryptoError::InvalidSignatureFormat),
            Self::Raw(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl<'a> From<&'a str> for SignatureInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Hex(s)
    }
}

impl<'a> From<&'a [u8]> for SignatureInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Raw(bytes)
    }
}
