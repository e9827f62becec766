//! Whitespace word counting
//!
//! A word is a maximal run of non-whitespace characters. Input is read line by
//! line so memory stays bounded by the longest line, not the file.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Words on one line; invalid UTF-8 is decoded lossily
pub fn count_line_words(line: &[u8]) -> usize {
    String::from_utf8_lossy(line).split_whitespace().count()
}

pub async fn count_words<R>(mut reader: R) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut total = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        total += count_line_words(&line);
    }
    Ok(total)
}

pub async fn count_file_words(path: &Path) -> io::Result<usize> {
    let file = File::open(path).await?;
    count_words(BufReader::new(file)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_line_words() {
        assert_eq!(count_line_words(b""), 0);
        assert_eq!(count_line_words(b"   \t  \n"), 0);
        assert_eq!(count_line_words(b"one"), 1);
        assert_eq!(count_line_words(b"  leading and trailing  \r\n"), 3);
        // Punctuation, digits and apostrophes stay inside words
        assert_eq!(count_line_words(b"don't stop-me now, 42!"), 4);
    }

    #[tokio::test]
    async fn test_count_words_across_lines() {
        let input: &[u8] = b"hello world\nfoo  bar baz\n";
        assert_eq!(count_words(input).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_count_words_without_trailing_newline() {
        let input: &[u8] = b"a b\n\n\nc";
        assert_eq!(count_words(input).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_words_empty() {
        let input: &[u8] = b"";
        assert_eq!(count_words(input).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_words_invalid_utf8() {
        let input: &[u8] = b"caf\xe9 au lait\n";
        assert_eq!(count_words(input).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_count_file_words_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "the quick brown fox\njumps over\tthe lazy dog\n").unwrap();

        let first = count_file_words(&path).await.unwrap();
        let second = count_file_words(&path).await.unwrap();
        assert_eq!(first, 9);
        assert_eq!(first, second);
    }
}
