//! API credential handling: parsing of `identifier:secret` auth keys.

use std::str::FromStr;

use crate::error::CredentialError;

/// BuyCoins API credential (public key + secret key).
///
/// Parsed from the single `"<identifier>:<secret>"` string issued by the
/// exchange. Only the first colon separates the parts, so the secret may
/// itself contain colons.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    /// Parse an auth key string.
    pub fn parse(auth_key: &str) -> Result<Self, CredentialError> {
        let (identifier, secret) = auth_key
            .trim()
            .split_once(':')
            .ok_or(CredentialError::MissingSeparator)?;
        if identifier.is_empty() {
            return Err(CredentialError::EmptyIdentifier);
        }
        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }
        Ok(Self {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Basic-Authentication username.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Basic-Authentication password.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl FromStr for Credential {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let cred = Credential::parse("pub_key:secret_key").unwrap();
        assert_eq!(cred.identifier(), "pub_key");
        assert_eq!(cred.secret(), "secret_key");
    }

    #[test]
    fn test_split_on_first_colon() {
        let cred: Credential = "abc:def:ghi".parse().unwrap();
        assert_eq!(cred.identifier(), "abc");
        assert_eq!(cred.secret(), "def:ghi");
    }

    #[test]
    fn test_missing_colon_fails() {
        assert_eq!(
            Credential::parse("no-colon-here"),
            Err(CredentialError::MissingSeparator)
        );
    }

    #[test]
    fn test_empty_parts_fail() {
        assert_eq!(Credential::parse(":secret"), Err(CredentialError::EmptyIdentifier));
        assert_eq!(Credential::parse("id:"), Err(CredentialError::EmptySecret));
        assert_eq!(Credential::parse(""), Err(CredentialError::MissingSeparator));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cred = Credential::parse("pub:hunter2").unwrap();
        let dbg = format!("{:?}", cred);
        assert!(dbg.contains("pub"));
        assert!(!dbg.contains("hunter2"));
    }
}
