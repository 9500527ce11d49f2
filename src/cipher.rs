//! Reversible obfuscation for stored database credentials.
//!
//! Running-key transform: each character is shifted by the matching
//! passphrase character and reduced modulo 127. This keeps a plaintext
//! password out of the configuration at rest; it is NOT cryptography.
//!
//! Compatibility note: the modulus aliases character codes >= 127, so two
//! distinct inputs can obfuscate to the same output and only codes in
//! `[0,126]` round-trip. Credentials already stored in the field were
//! produced by this exact transform, so the scheme must not be replaced
//! with a stronger one without re-obfuscating every stored value.

const MODULUS: i64 = 127;

/// Fixed passphrase shared with the legacy deployment. Changing it breaks
/// every credential already stored in obfuscated form.
pub const OBFUSCATION_PASSPHRASE: &str = "password encryption";

#[derive(Debug, PartialEq, Eq)]
pub enum CipherError {
    EmptyPassphrase,
}

impl std::fmt::Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherError::EmptyPassphrase => write!(f, "obfuscation passphrase must not be empty"),
        }
    }
}

impl std::error::Error for CipherError {}

/// Obfuscate a plaintext secret with the given passphrase.
pub fn obfuscate(passphrase: &str, plaintext: &str) -> Result<String, CipherError> {
    shift(passphrase, plaintext, 1)
}

/// Recover the plaintext from an obfuscated secret.
///
/// Inverse of [`obfuscate`] for every character whose code is below 127.
pub fn deobfuscate(passphrase: &str, ciphertext: &str) -> Result<String, CipherError> {
    shift(passphrase, ciphertext, -1)
}

fn shift(passphrase: &str, input: &str, direction: i64) -> Result<String, CipherError> {
    if passphrase.is_empty() {
        return Err(CipherError::EmptyPassphrase);
    }

    let key: Vec<i64> = passphrase.chars().map(|c| c as i64).collect();
    let mut out = String::with_capacity(input.len());

    for (i, c) in input.chars().enumerate() {
        let code = (c as i64 + direction * key[i % key.len()]).rem_euclid(MODULUS);
        // rem_euclid keeps the code in [0,126], always a valid ASCII char
        out.push(char::from(code as u8));
    }

    Ok(out)
}
