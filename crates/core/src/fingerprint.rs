use sha2::{Digest, Sha256};

pub const FINGERPRINT_LEN: usize = 32;

/// SHA-256 digest of clipboard content. Only ever compared, never decoded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Rejects anything that is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; FINGERPRINT_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Byte-for-byte comparison; a digest of any other length never matches.
    pub fn matches(&self, other: &[u8]) -> bool {
        other.len() == FINGERPRINT_LEN && self.0[..] == *other
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

/// Stateless hasher shared by the writer and the ownership tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintEngine;

impl FingerprintEngine {
    pub fn digest(&self, bytes: &[u8]) -> Fingerprint {
        let mut out = [0u8; FINGERPRINT_LEN];
        out.copy_from_slice(&Sha256::digest(bytes));
        Fingerprint(out)
    }

    pub fn digest_text(&self, text: &str) -> Fingerprint {
        self.digest(text.as_bytes())
    }
}
