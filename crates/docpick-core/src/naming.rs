// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure helpers for taking URIs apart and naming imported files.
//
// Name resolution is two steps: the platform's display-name metadata when it
// has any, otherwise the last segment of the URI path. Only the second step
// lives here; the first needs a content resolver.

/// Scheme of a URI (`content`, `file`, ...), if it has one.
pub fn uri_scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme)
    } else {
        None
    }
}

/// Decoded path component of a URI.
///
/// Strips scheme, authority, query and fragment, then percent-decodes the
/// rest. A string with no scheme is treated as a bare path.
pub fn uri_path(uri: &str) -> String {
    let rest = match uri_scheme(uri) {
        Some(scheme) => &uri[scheme.len() + 1..],
        None => uri,
    };
    let rest = match rest.strip_prefix("//") {
        Some(after) => after.find('/').map_or("", |i| &after[i..]),
        None => rest,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let raw = &rest[..end];
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Everything after the last `/` of the URI path.
pub fn last_path_segment(uri: &str) -> String {
    let path = uri_path(uri);
    match path.rfind('/') {
        Some(cut) => path[cut + 1..].to_string(),
        None => path,
    }
}

/// Pick the display name: metadata first, else the last path segment.
pub fn resolve_display_name(metadata_name: Option<String>, uri: &str) -> String {
    metadata_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| last_path_segment(uri))
}

/// Minimum prefix length accepted by `java.io.File.createTempFile`.
pub const MIN_TEMP_PREFIX_LEN: usize = 3;

/// Longest prefix, in bytes, that still leaves room under the common
/// 255-byte file-name limit for the random characters the temp file adds.
pub const MAX_TEMP_PREFIX_BYTES: usize = 240;

/// Turn a display name into a temp-file prefix.
///
/// Path separators and NULs are replaced so the prefix cannot escape the
/// cache directory; short names are padded with `_` and long ones cut to
/// [`MAX_TEMP_PREFIX_BYTES`] on a character boundary.
pub fn temp_file_prefix(display_name: &str) -> String {
    let mut prefix = String::with_capacity(display_name.len().min(MAX_TEMP_PREFIX_BYTES));
    for c in display_name.chars() {
        let c = match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        };
        if prefix.len() + c.len_utf8() > MAX_TEMP_PREFIX_BYTES {
            break;
        }
        prefix.push(c);
    }
    while prefix.chars().count() < MIN_TEMP_PREFIX_LEN {
        prefix.push('_');
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_detection() {
        assert_eq!(uri_scheme("content://media/external/1"), Some("content"));
        assert_eq!(uri_scheme("file:///tmp/a.txt"), Some("file"));
        assert_eq!(uri_scheme("/sdcard/Download/a.txt"), None);
        assert_eq!(uri_scheme("1abc:foo"), None);
    }

    #[test]
    fn path_drops_authority_query_and_fragment() {
        assert_eq!(
            uri_path("content://com.android.providers.downloads.documents/document/raw%3A%2Fstorage%2Fnotes.txt?x=1#frag"),
            "/document/raw:/storage/notes.txt"
        );
        assert_eq!(uri_path("file:///tmp/a%20b.txt"), "/tmp/a b.txt");
        assert_eq!(uri_path("content://authority"), "");
    }

    #[test]
    fn last_segment_of_plain_identifier() {
        assert_eq!(
            last_path_segment("content://com.example.provider/docs/report.pdf"),
            "report.pdf"
        );
        assert_eq!(last_path_segment("file:///sdcard/Download/x.bin"), "x.bin");
        assert_eq!(last_path_segment("no-slashes"), "no-slashes");
    }

    #[test]
    fn last_segment_sees_through_encoded_separators() {
        assert_eq!(
            last_path_segment("content://downloads/document/raw%3A%2Fstorage%2Fnotes.txt"),
            "notes.txt"
        );
    }

    #[test]
    fn metadata_name_wins() {
        assert_eq!(
            resolve_display_name(Some("report.pdf".into()), "content://p/document/42"),
            "report.pdf"
        );
    }

    #[test]
    fn empty_or_missing_metadata_falls_back() {
        assert_eq!(resolve_display_name(None, "content://p/document/42"), "42");
        assert_eq!(
            resolve_display_name(Some(String::new()), "content://p/docs/a.png"),
            "a.png"
        );
    }

    #[test]
    fn prefix_is_padded_and_sanitised() {
        assert_eq!(temp_file_prefix("42"), "42_");
        assert_eq!(temp_file_prefix(""), "___");
        assert_eq!(temp_file_prefix("../etc/passwd"), ".._etc_passwd");
        assert_eq!(temp_file_prefix("report.pdf"), "report.pdf");
    }

    #[test]
    fn long_ascii_name_is_capped() {
        let name = format!("{}.pdf", "a".repeat(300));
        let prefix = temp_file_prefix(&name);
        assert_eq!(prefix.len(), MAX_TEMP_PREFIX_BYTES);
        assert!(name.starts_with(&prefix));
    }

    #[test]
    fn long_multibyte_name_is_cut_on_char_boundary() {
        let name = format!("x{}", "\u{65e5}".repeat(100));
        let prefix = temp_file_prefix(&name);
        assert_eq!(prefix.len(), 1 + 79 * 3);
        assert!(name.starts_with(&prefix));

        let mixed = format!("{}{}", "b".repeat(MAX_TEMP_PREFIX_BYTES - 1), "\u{e9}");
        assert_eq!(temp_file_prefix(&mixed), "b".repeat(MAX_TEMP_PREFIX_BYTES - 1));
    }
}
