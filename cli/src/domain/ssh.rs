//! Key material sniffing and normalization.
//!
//! Every candidate file is tried as an OpenSSH public key and, independently,
//! as an unencrypted PEM private key. A failed parse only means "not this kind
//! of file", so both sniffers return `Option` instead of an error.

use std::path::{Path, PathBuf};

use russh_keys::ssh_key::private::EcdsaKeypair;
use russh_keys::ssh_key::{LineEnding, PrivateKey, PublicKey};

use crate::domain::error::KeyError;

/// Public and private key halves discovered in the tunnel options folder,
/// already re-encoded to their canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_text: String,
    pub public_source_path: PathBuf,
    pub private_text: String,
    pub private_source_path: PathBuf,
}

impl KeyPair {
    /// Remote login user encoded in the private key's file name.
    #[must_use]
    pub fn login_user(&self) -> String {
        login_user(&self.private_source_path)
    }
}

/// Parse `bytes` as an OpenSSH public key line and return its canonical
/// `<algorithm> <base64>` form without a comment.
#[must_use]
pub fn sniff_public_key(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?;
    let mut key = PublicKey::from_openssh(text.trim()).ok()?;
    key.set_comment("");
    key.to_openssh().ok()
}

/// Parse `bytes` as an unencrypted PEM private key (OpenSSH, PKCS#1, PKCS#8
/// or SEC1 `EC PRIVATE KEY`) and return it re-encoded as an unencrypted
/// OpenSSH PEM document.
#[must_use]
pub fn sniff_private_key(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?;
    let key = match russh_keys::decode_secret_key(text, None) {
        Ok(key) => key,
        Err(_) => decode_sec1(text)?,
    };
    if key.is_encrypted() {
        return None;
    }
    let pem = key.to_openssh(LineEnding::LF).ok()?;
    Some(pem.to_string())
}

/// SEC1 `EC PRIVATE KEY` documents on the NIST P-256 and P-384 curves.
fn decode_sec1(text: &str) -> Option<PrivateKey> {
    let keypair = if let Ok(secret) = p256::SecretKey::from_sec1_pem(text) {
        EcdsaKeypair::NistP256 {
            public: secret.public_key().into(),
            private: secret.into(),
        }
    } else if let Ok(secret) = p384::SecretKey::from_sec1_pem(text) {
        EcdsaKeypair::NistP384 {
            public: secret.public_key().into(),
            private: secret.into(),
        }
    } else {
        return None;
    };
    Some(PrivateKey::from(keypair))
}

/// Scan `candidates` in order and keep the first public and first private key.
///
/// `folder` is only used in the error message.
///
/// # Errors
///
/// Returns [`KeyError::MissingKeyMaterial`] if either half is not found.
pub fn find_key_pair<I>(folder: &Path, candidates: I) -> Result<KeyPair, KeyError>
where
    I: IntoIterator<Item = (PathBuf, Vec<u8>)>,
{
    let mut public: Option<(String, PathBuf)> = None;
    let mut private: Option<(String, PathBuf)> = None;

    for (path, bytes) in candidates {
        if public.is_none()
            && let Some(text) = sniff_public_key(&bytes)
        {
            public = Some((text, path.clone()));
        }
        if private.is_none()
            && let Some(text) = sniff_private_key(&bytes)
        {
            private = Some((text, path));
        }
        if public.is_some() && private.is_some() {
            break;
        }
    }

    match (public, private) {
        (Some((public_text, public_source_path)), Some((private_text, private_source_path))) => {
            Ok(KeyPair {
                public_text,
                public_source_path,
                private_text,
                private_source_path,
            })
        }
        (public, private) => Err(KeyError::MissingKeyMaterial {
            folder: folder.to_path_buf(),
            missing: match (public.is_some(), private.is_some()) {
                (false, false) => "public and private key",
                (false, true) => "public key",
                _ => "private key",
            },
        }),
    }
}

/// Login user for the relay host: the key file name without its last extension.
///
/// `alice.pem` → `alice`, `key.backup.pem` → `key.backup`, `alice` → `alice`.
#[must_use]
pub fn login_user(private_key_path: &Path) -> String {
    let name = private_key_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
