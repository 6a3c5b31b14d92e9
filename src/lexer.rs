//! Argument tokenization for a single command segment.
//!
//! Words are separated by runs of blanks and tabs. There is no quoting and no
//! escaping: `echo 'a b'` yields the three words `echo`, `'a` and `b'`.

/// Characters that separate words.
pub const DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// Splits `segment` into its argument vector. A blank segment yields an empty
/// vector.
pub fn split_args(segment: &str) -> Vec<String> {
    segment
        .split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
