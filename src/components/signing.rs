use std::fmt::Debug;

#[derive(thiserror::Error, Debug)]
pub enum SigningError {
    #[error("Href {0:?} can not be signed")]
    InvalidUrl(String),
}

/// Provider specific transformation of asset hrefs before reading.
pub trait SignUrl: Debug {
    fn sign(&self, href: &str) -> Result<String, SigningError>;
}

/// Leaves hrefs untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsigned;

impl SignUrl for Unsigned {
    fn sign(&self, href: &str) -> Result<String, SigningError> {
        Ok(href.to_string())
    }
}

/// Appends a shared access signature token to blob storage hrefs.
#[derive(Debug, Clone)]
pub struct SasTokenSigner {
    token: String,
}

impl SasTokenSigner {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: token.trim_start_matches('?').to_string(),
        }
    }
}

impl SignUrl for SasTokenSigner {
    fn sign(&self, href: &str) -> Result<String, SigningError> {
        if !(href.starts_with("https://") || href.starts_with("http://")) {
            return Err(SigningError::InvalidUrl(href.into()));
        }
        // Already signed hrefs carry a query.
        if href.contains('?') {
            return Ok(href.to_string());
        }
        Ok(format!("{href}?{}", self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://acct.blob.core.windows.net/c/B4.TIF", "https://acct.blob.core.windows.net/c/B4.TIF?st=1&sig=x")]
    #[case("https://acct.blob.core.windows.net/c/B4.TIF?st=0", "https://acct.blob.core.windows.net/c/B4.TIF?st=0")]
    fn appends_token(#[case] href: &str, #[case] expected: &str) {
        let signer = SasTokenSigner::new("?st=1&sig=x");
        assert_eq!(signer.sign(href).unwrap(), expected);
    }

    #[test]
    fn rejects_local_paths() {
        assert!(matches!(
            SasTokenSigner::new("st=1").sign("/data/B4.TIF"),
            Err(SigningError::InvalidUrl(_))
        ));
    }

    #[test]
    fn unsigned_is_identity() {
        assert_eq!(Unsigned.sign("s3://bucket/B4.TIF").unwrap(), "s3://bucket/B4.TIF");
    }
}
