//! Log sanitization utilities
//!
//! Certificate detail responses echo the PEM chain and, for uploaded
//! certificates, the private key. Response bodies pass through here before
//! they reach a debug or error log.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";
const PEM_PLACEHOLDER: &str = "<redacted pem>";

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Replace every PEM block (`-----BEGIN ...-----END ...-----`) with a placeholder.
///
/// An unterminated block is redacted up to the end of the input.
pub fn redact_pem(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find(PEM_BEGIN) {
        out.push_str(&rest[..start]);
        out.push_str(PEM_PLACEHOLDER);

        let block = &rest[start..];
        let Some(end) = block.find(PEM_END) else {
            return out;
        };
        // 跳过 "-----END XXX-----"
        let after_end = &block[end + PEM_END.len()..];
        rest = match after_end.find("-----") {
            Some(close) => &after_end[close + 5..],
            None => "",
        };
    }

    out.push_str(rest);
    out
}

/// Truncate a string for safe logging.
///
/// PEM material is redacted first. Returns the result unchanged if it's
/// within the limit, otherwise the first `TRUNCATE_LIMIT` bytes with a
/// suffix indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    let s = redact_pem(s);
    if s.len() <= TRUNCATE_LIMIT {
        s
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(&s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}
