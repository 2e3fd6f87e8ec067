//! Constant-time byte comparison.

/// Compare two byte slices without short-circuiting on the first difference.
///
/// Slices of different length compare unequal immediately; only the length is
/// observable in that case.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    std::hint::black_box(diff) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_slices() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn differing_slices() {
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"xbc"));
    }

    #[test]
    fn differing_lengths() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
