//! Heuristic text/binary classification.
//!
//! Known limitation: encodings such as UTF-16 contain NUL bytes and are
//! reported as binary.

const SAMPLE_LEN: usize = 512;
// Binary when suspicious / sampled > 3 / 10.
const CONTROL_RATIO: (usize, usize) = (3, 10);

fn is_suspicious(byte: u8) -> bool {
    (byte < 32 && !matches!(byte, b'\n' | b'\r' | b'\t' | b' ')) || byte == 127
}

/// Any NUL byte means binary. Otherwise the first 512 bytes are sampled and
/// the content is binary when more than 30% of them are control characters
/// other than newline, carriage return and tab (DEL counts as control).
pub fn is_binary(content: &[u8]) -> bool {
    if content.contains(&0) {
        return true;
    }

    let sample = &content[..content.len().min(SAMPLE_LEN)];
    if sample.is_empty() {
        return false;
    }

    let suspicious = sample.iter().filter(|&&b| is_suspicious(b)).count();
    let (num, den) = CONTROL_RATIO;
    suspicious * den > sample.len() * num
}
