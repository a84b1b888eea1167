use courier_api::validation::is_handle_char;

/// A parsed `@username` occurrence. `raw` always equals the substring of the
/// scanned text at `[index, index + length)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionToken {
    pub raw: String,
    pub username: String,
    pub index: usize,
    pub length: usize,
}

/// Scans text left to right for `@` followed by at least one handle
/// character (ASCII letters, digits, `_`, `.`, `-`). Tokens never overlap.
///
/// The scanner is byte-oriented: `@` and every handle character are ASCII,
/// so multi-byte UTF-8 simply terminates a handle and all indices fall on
/// char boundaries.
pub fn extract_mentions(text: &str) -> Vec<MentionToken> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'@' {
            let start = i;
            let mut end = i + 1;
            while end < bytes.len()
                && bytes[end].is_ascii()
                && is_handle_char(bytes[end] as char)
            {
                end += 1;
            }
            if end > start + 1 {
                tokens.push(MentionToken {
                    raw: text[start..end].to_string(),
                    username: text[start + 1..end].to_string(),
                    index: start,
                    length: end - start,
                });
                i = end;
                continue;
            }
        }
        i += 1;
    }
    tokens
}
