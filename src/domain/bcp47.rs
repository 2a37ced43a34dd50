//! Syntactic BCP 47 language tag check.
//!
//! See <https://tools.ietf.org/html/bcp47#section-2.1>. Only well-formedness is checked,
//! subtags are not looked up in any registry.

/// Double the longest example tag in RFC 5646 section 4.4.2 (49 characters).
pub const MAX_TAG_LEN: usize = 100;

/// Returns true if `tag` is a syntactically well-formed language tag.
///
/// The empty string is rejected here; callers that treat "" as "no language"
/// have to check for it before calling.
pub fn is_valid_language_tag(tag: &str) -> bool {
    // every position is inspected below and only ASCII is ever accepted,
    // so byte offsets are character offsets for any tag that passes
    let bytes = tag.as_bytes();
    let len = bytes.len();

    if !(2..=MAX_TAG_LEN).contains(&len) {
        return false;
    }

    let first = bytes[0];
    if !first.is_ascii_alphabetic() {
        return false;
    }

    let second = bytes[1];
    if len == 2 {
        return second.is_ascii_alphabetic();
    }

    let grandfathered_or_private_use = matches!(first, b'i' | b'x') && second == b'-';

    let scan_from = if grandfathered_or_private_use {
        2
    } else {
        if !second.is_ascii_alphabetic() {
            return false;
        }

        if len == 3 {
            return bytes[2].is_ascii_alphabetic();
        }

        match bytes[2] {
            c if c.is_ascii_alphabetic() => {
                if bytes[3] != b'-' {
                    return false;
                }
                4
            }
            b'-' => 3,
            _ => return false,
        }
    };

    bytes[scan_from..]
        .iter()
        .all(|c| c.is_ascii_alphanumeric() || *c == b'-')
}
