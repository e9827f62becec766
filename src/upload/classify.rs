//! Binary content detection
//!
//! A file counts as binary when its leading sample holds a NUL byte, or when
//! more than 30% of the sample looks like non-text.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Bytes inspected from the start of a file
pub const SAMPLE_SIZE: usize = 8192;

/// Percentage of suspicious bytes above which a sample is binary
const NON_TEXT_PERCENT: usize = 30;

pub fn is_binary(sample: &[u8]) -> bool {
    let sample = &sample[..sample.len().min(SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    // Without valid UTF-8, high bytes are as suspicious as stray control codes.
    let utf8 = is_utf8_prefix(sample);
    let suspicious = sample
        .iter()
        .filter(|&&b| is_control(b) || (!utf8 && b >= 0x80))
        .count();

    suspicious * 100 > sample.len() * NON_TEXT_PERCENT
}

/// Read the leading sample of a stored file and classify it
pub async fn is_binary_file(path: &Path) -> io::Result<bool> {
    let file = File::open(path).await?;
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample).await?;
    Ok(is_binary(&sample))
}

/// Valid UTF-8, tolerating a multi-byte sequence cut off by the sample boundary
fn is_utf8_prefix(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// C0 controls that do not show up in ordinary text, plus DEL
const fn is_control(b: u8) -> bool {
    match b {
        b'\t' | b'\n' | b'\r' | 0x0c | 0x08 | 0x1b => false,
        0x00..=0x1f | 0x7f => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_text() {
        assert!(!is_binary(b""));
    }

    #[test]
    fn test_plain_text() {
        assert!(!is_binary(b"hello world\nfoo  bar baz\n"));
        assert!(!is_binary("caf\u{e9} na\u{ef}ve r\u{e9}sum\u{e9}\r\n\tindented".as_bytes()));
    }

    #[test]
    fn test_nul_byte_is_binary() {
        assert!(is_binary(b"mostly text\0with one nul"));
    }

    #[test]
    fn test_control_heavy_is_binary() {
        let sample: Vec<u8> = (0..100u8).map(|i| if i % 2 == 0 { 0x01 } else { b'a' }).collect();
        assert!(is_binary(&sample));
    }

    #[test]
    fn test_few_controls_are_tolerated() {
        let mut sample = b"some text with an odd control byte ".to_vec();
        sample.push(0x07);
        assert!(!is_binary(&sample));
    }

    #[test]
    fn test_truncated_utf8_is_text() {
        let text = "\u{e9}\u{e9}\u{e9}\u{e9}";
        let bytes = text.as_bytes();
        // Cut the last two-byte character in half.
        assert!(!is_binary(&bytes[..bytes.len() - 1]));
    }

    #[test]
    fn test_high_bytes_without_utf8_are_binary() {
        let sample: Vec<u8> = (0..64u8).map(|i| 0x80 | i).collect();
        assert!(is_binary(&sample));
    }

    #[test]
    fn test_only_sample_is_inspected() {
        let mut data = vec![b'a'; SAMPLE_SIZE];
        data.push(0);
        assert!(!is_binary(&data));
    }

    #[tokio::test]
    async fn test_is_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("text");
        let png = dir.path().join("png");
        std::fs::write(&text, "plain words here\n").unwrap();
        std::fs::write(&png, [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d]).unwrap();

        assert!(!is_binary_file(&text).await.unwrap());
        assert!(is_binary_file(&png).await.unwrap());
        assert!(is_binary_file(&dir.path().join("missing")).await.is_err());
    }
}
