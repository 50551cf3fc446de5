use base64::{STANDARD, decode_config};

/// Decodes a URL-safe base64 application server key into raw bytes:
/// padding is restored, `-`/`_` are mapped to `+`/`/`, then standard
/// base64 decoding applies.
pub fn url_base64_to_bytes(key: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let padding = (4 - key.len() % 4) % 4;
    let mut padded = String::with_capacity(key.len() + padding);
    padded.push_str(key);
    padded.extend(std::iter::repeat_n('=', padding));
    let standard = padded.replace('-', "+").replace('_', "/");
    decode_config(standard, STANDARD)
}
