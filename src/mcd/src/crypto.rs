//! Minecraft Dungeons save container encryption and decryption
//!
//! A `.dat` save is an 8-byte header (two 4-byte magic values) followed by
//! the JSON document encrypted with AES in ECB mode. The plaintext is padded
//! with ASCII spaces to a whole number of 16-byte blocks; there is no PKCS7
//! padding and no authentication tag.

#[allow(deprecated)]
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// First magic value of the container header
pub const MAGIC_PRIMARY: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// Second magic value of the container header
pub const MAGIC_SECONDARY: [u8; 4] = [0x63, 0x79, 0x6E, 0x82];

/// Total header length
pub const HEADER_LEN: usize = MAGIC_PRIMARY.len() + MAGIC_SECONDARY.len();

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Save file is {0} bytes, shorter than the {HEADER_LEN}-byte header")]
    Truncated(usize),

    #[error("Unrecognized save header {0}")]
    BadMagic(String),

    #[error("Unsupported key length {0} (expected 16, 24 or 32 bytes)")]
    InvalidKeyLength(usize),

    #[error("Encrypted payload size {0} is not a multiple of 16 bytes")]
    InvalidSize(usize),

    #[error("Key is not valid hex: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),
}

impl CryptoError {
    /// True for malformed container headers, as opposed to cipher problems.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Truncated(_) | Self::BadMagic(_))
    }
}

/// AES in ECB mode, sized by the key
enum EcbCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl EcbCipher {
    fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            other => Err(CryptoError::InvalidKeyLength(other)),
        }
    }

    fn encrypt_blocks(&self, data: &mut [u8]) {
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            #[allow(deprecated)]
            let block = GenericArray::from_mut_slice(chunk);
            match self {
                Self::Aes128(c) => c.encrypt_block(block),
                Self::Aes192(c) => c.encrypt_block(block),
                Self::Aes256(c) => c.encrypt_block(block),
            }
        }
    }

    fn decrypt_blocks(&self, data: &mut [u8]) {
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            #[allow(deprecated)]
            let block = GenericArray::from_mut_slice(chunk);
            match self {
                Self::Aes128(c) => c.decrypt_block(block),
                Self::Aes192(c) => c.decrypt_block(block),
                Self::Aes256(c) => c.decrypt_block(block),
            }
        }
    }
}

/// Right-pad with ASCII spaces to a multiple of the block size
fn space_pad(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(data);
    padded.resize(padded_len, b' ');
    padded
}

/// Strip surrounding whitespace and any NUL padding
fn trim_padding(data: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| b.is_ascii_whitespace() || *b == 0;
    let start = data.iter().position(|b| !is_pad(b)).unwrap_or(data.len());
    let end = data.iter().rposition(|b| !is_pad(b)).map_or(start, |i| i + 1);
    &data[start..end]
}

/// Decrypt a .dat file to its JSON bytes
///
/// # Format
/// - Bytes 0..8: [`MAGIC_PRIMARY`] then [`MAGIC_SECONDARY`]
/// - Bytes 8..: AES-ECB ciphertext of space-padded JSON
///
/// A wrong key is not detected here: ECB has no integrity check, so the
/// result must still be validated as JSON by the caller.
pub fn decrypt_dat(encrypted_data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if encrypted_data.len() < HEADER_LEN {
        return Err(CryptoError::Truncated(encrypted_data.len()));
    }

    let (header, payload) = encrypted_data.split_at(HEADER_LEN);
    if header[..4] != MAGIC_PRIMARY || header[4..] != MAGIC_SECONDARY {
        return Err(CryptoError::BadMagic(hex::encode(header)));
    }

    let cipher = EcbCipher::new(key)?;

    if !payload.len().is_multiple_of(BLOCK_SIZE) {
        return Err(CryptoError::InvalidSize(payload.len()));
    }

    let mut decrypted = payload.to_vec();
    cipher.decrypt_blocks(&mut decrypted);
    tracing::trace!(blocks = decrypted.len() / BLOCK_SIZE, "decrypted save payload");

    Ok(trim_padding(&decrypted).to_vec())
}

/// Encrypt JSON bytes to a .dat file
///
/// # Format
/// - Pads with spaces to 16-byte blocks
/// - Encrypts with AES-ECB
/// - Prepends the 8-byte header
pub fn encrypt_dat(json_data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = EcbCipher::new(key)?;

    let mut payload = space_pad(json_data);
    cipher.encrypt_blocks(&mut payload);
    tracing::trace!(blocks = payload.len() / BLOCK_SIZE, "encrypted save payload");

    let mut encrypted = Vec::with_capacity(HEADER_LEN + payload.len());
    encrypted.extend_from_slice(&MAGIC_PRIMARY);
    encrypted.extend_from_slice(&MAGIC_SECONDARY);
    encrypted.extend_from_slice(&payload);
    Ok(encrypted)
}

/// Parse a hex encoded key, as stored in configuration
pub fn parse_key(hex_key: &str) -> Result<Vec<u8>, CryptoError> {
    let key = hex::decode(hex_key.trim())?;
    // Validate the length up front so configuration errors surface early.
    EcbCipher::new(&key)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [
        0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD,
        0xEF,
    ];

    #[test]
    fn test_roundtrip() {
        let original = br#"{"xp":1200,"items":[]}"#;

        let encrypted = encrypt_dat(original, &KEY).unwrap();
        let decrypted = decrypt_dat(&encrypted, &KEY).unwrap();

        assert_eq!(original, &decrypted[..]);
    }

    #[test]
    fn test_roundtrip_all_key_sizes() {
        let original = b"{\"a\": \"exactly sixteen!\"}";
        for len in [16, 24, 32] {
            let key: Vec<u8> = (0..len as u8).collect();
            let encrypted = encrypt_dat(original, &key).unwrap();
            assert_eq!(decrypt_dat(&encrypted, &key).unwrap(), original.to_vec());
        }
    }

    #[test]
    fn test_layout() {
        let encrypted = encrypt_dat(b"{}", &KEY).unwrap();
        assert_eq!(&encrypted[..4], &MAGIC_PRIMARY);
        assert_eq!(&encrypted[4..8], &MAGIC_SECONDARY);
        assert_eq!(encrypted.len(), HEADER_LEN + BLOCK_SIZE);
    }

    #[test]
    fn test_block_aligned_input_is_not_padded() {
        let aligned = [b'x'; 32];
        let encrypted = encrypt_dat(&aligned, &KEY).unwrap();
        assert_eq!(encrypted.len(), HEADER_LEN + 32);
    }

    #[test]
    fn test_truncated_header() {
        let err = decrypt_dat(&[0x01, 0x00, 0x00], &KEY).unwrap_err();
        assert!(matches!(err, CryptoError::Truncated(3)));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_corrupted_magic() {
        let mut encrypted = encrypt_dat(b"{}", &KEY).unwrap();
        for byte in &mut encrypted[..4] {
            *byte = !*byte;
        }
        let err = decrypt_dat(&encrypted, &KEY).unwrap_err();
        assert!(matches!(err, CryptoError::BadMagic(_)));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_corrupted_second_magic() {
        let mut encrypted = encrypt_dat(b"{}", &KEY).unwrap();
        encrypted[7] ^= 0xFF;
        assert!(matches!(
            decrypt_dat(&encrypted, &KEY),
            Err(CryptoError::BadMagic(_))
        ));
    }

    #[test]
    fn test_invalid_key_length() {
        let err = encrypt_dat(b"{}", &[0u8; 15]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength(15)));
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_ragged_payload() {
        let mut encrypted = encrypt_dat(b"{}", &KEY).unwrap();
        encrypted.pop();
        assert!(matches!(
            decrypt_dat(&encrypted, &KEY),
            Err(CryptoError::InvalidSize(15))
        ));
    }

    #[test]
    fn test_wrong_key_yields_garbage() {
        let encrypted = encrypt_dat(br#"{"xp":1}"#, &KEY).unwrap();
        let mut other = KEY;
        other[0] ^= 0x01;
        let decrypted = decrypt_dat(&encrypted, &other).unwrap();
        assert_ne!(decrypted, br#"{"xp":1}"#.to_vec());
    }

    #[test]
    fn test_trim_padding() {
        assert_eq!(trim_padding(b"  {}  \0\0"), b"{}");
        assert_eq!(trim_padding(b"   "), b"");
        assert_eq!(trim_padding(b""), b"");
    }

    #[test]
    fn test_parse_key() {
        let key = parse_key("00112233445566778899aabbccddeeff").unwrap();
        assert_eq!(key.len(), 16);
        assert!(matches!(
            parse_key("0011"),
            Err(CryptoError::InvalidKeyLength(2))
        ));
        assert!(matches!(parse_key("zz"), Err(CryptoError::InvalidKeyHex(_))));
    }
}
