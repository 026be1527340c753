/// Upload size limit for certificate files.
pub const MAX_SIZE: usize = 10 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("certificate content is empty")]
    Empty,
    #[error("certificate exceeds the size limit of {limit} bytes: {size}")]
    TooLarge { size: usize, limit: usize },
    #[error("{0}")]
    Rejected(String),
}

/// Validates certificate content before anything is stored.
///
/// The gallery plugs in the full X.509 checks here. The built-in
/// implementation only guards the obvious.
pub trait CertificateValidator: Send + Sync {
    fn validate(&self, data: &[u8]) -> Result<(), ValidationError>;
}

#[derive(Clone, Copy, Debug)]
pub struct BasicCertificateValidator {
    limit: usize,
}

impl BasicCertificateValidator {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for BasicCertificateValidator {
    fn default() -> Self {
        Self::new(MAX_SIZE)
    }
}

impl CertificateValidator for BasicCertificateValidator {
    fn validate(&self, data: &[u8]) -> Result<(), ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::Empty);
        }

        if data.len() > self.limit {
            return Err(ValidationError::TooLarge {
                size: data.len(),
                limit: self.limit,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_reasonable_content() {
        let validator = BasicCertificateValidator::default();
        assert!(validator.validate(b"-----BEGIN CERTIFICATE-----").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let validator = BasicCertificateValidator::default();
        assert!(matches!(
            validator.validate(b""),
            Err(ValidationError::Empty)
        ));
    }

    #[test]
    fn rejects_oversized() {
        let validator = BasicCertificateValidator::new(4);
        assert!(matches!(
            validator.validate(b"too large"),
            Err(ValidationError::TooLarge { size: 9, limit: 4 })
        ));
    }
}
