use ring::digest::{Context, Digest, SHA1_FOR_LEGACY_USE_ONLY, SHA256};
use tracing::instrument;

pub struct Contexts {
    sha256: Context,
    sha1: Context,
    size: u64,
}

impl Contexts {
    pub fn new() -> Self {
        Self {
            sha256: Context::new(&SHA256),
            sha1: Context::new(&SHA1_FOR_LEGACY_USE_ONLY),
            size: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.sha256.update(data);
        self.sha1.update(data);
        self.size += data.len() as u64;
    }

    pub fn finish(self) -> Digests {
        Digests {
            sha256: self.sha256.finish(),
            sha1: self.sha1.finish(),
            size: self.size,
        }
    }
}

impl Default for Contexts {
    fn default() -> Self {
        Self::new()
    }
}

/// Digests over the raw bytes of an uploaded certificate.
///
/// SHA-256 is the primary identity. SHA-1 is carried for clients which still
/// key on the legacy thumbprint.
#[derive(Clone, Debug)]
pub struct Digests {
    pub sha256: Digest,
    pub sha1: Digest,
    pub size: u64,
}

impl Digests {
    #[instrument(skip_all, fields(len = data.as_ref().len()))]
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        let mut contexts = Contexts::new();
        contexts.update(data.as_ref());
        contexts.finish()
    }
}

#[cfg(test)]
mod test {
    use super::Digests;
    use hex::ToHex;

    const SHA256: &str = "a591a6d40bf420404a011733cfb7b190d62c65bf0bcda32b57b277d9ad9f146e";
    const SHA1: &str = "0a4d55a8d778e5022fab701977c5d840bbc486d0";

    /// Digests must be a pure function of the input bytes.
    #[test]
    fn known_vector() {
        let digests = Digests::digest(b"Hello World");

        assert_eq!(digests.sha256.encode_hex::<String>(), SHA256);
        assert_eq!(digests.sha1.encode_hex::<String>(), SHA1);
        assert_eq!(digests.size, 11);
    }

    #[test]
    fn deterministic() {
        let a = Digests::digest(b"certificate bytes");
        let b = Digests::digest(b"certificate bytes");

        assert_eq!(a.sha256.as_ref(), b.sha256.as_ref());
        assert_eq!(a.sha1.as_ref(), b.sha1.as_ref());
    }

    #[test]
    fn incremental_update_matches_oneshot() {
        let mut contexts = super::Contexts::new();
        contexts.update(b"Hello ");
        contexts.update(b"World");
        let digests = contexts.finish();

        assert_eq!(digests.sha256.encode_hex::<String>(), SHA256);
        assert_eq!(digests.size, 11);
    }
}
