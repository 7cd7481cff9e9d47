//! JSON Pointer implementation (RFC 6901).
//!
//! Pointers identify schema locations inside a document and form the fragment
//! part of every canonical schema URI. Segments are `/`-separated, with `~`
//! escaped as `~0` and `/` escaped as `~1`.

use serde_json::Value;

/// Appends a segment to a JSON Pointer path, applying RFC 6901 escaping.
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Splits a pointer into unescaped segments.
///
/// Returns `None` when the pointer is neither empty nor starts with `/`.
#[must_use]
pub fn segments(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest: &str = pointer.strip_prefix('/')?;
    Some(
        rest.split('/')
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect(),
    )
}

/// Looks up the value a pointer designates.
#[must_use]
pub fn lookup<'v>(root: &'v Value, pointer: &str) -> Option<&'v Value> {
    let mut current: &Value = root;
    for segment in segments(pointer)? {
        current = step(current, &segment)?;
    }
    Some(current)
}

/// Moves one segment down from `value`: a member key or an array index.
#[must_use]
pub fn step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Decodes `%XX` escapes in a URI fragment.
///
/// Invalid escapes are kept verbatim.
#[must_use]
pub fn percent_decode(fragment: &str) -> String {
    let bytes: &[u8] = fragment.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i: usize = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(decoded) = fragment
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        {
            out.push(decoded);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segment_with_slash() {
        let mut path = String::new();
        push_segment(&mut path, "a/b");
        assert_eq!(path, "/a~1b");
    }

    #[test]
    fn segment_with_both_slash_and_tilde() {
        let mut path = String::new();
        push_segment(&mut path, "~1");
        assert_eq!(path, "/~01");
    }

    #[test]
    fn multiple_segments() {
        let mut path = String::new();
        push_segment(&mut path, "properties");
        push_segment(&mut path, "foo");
        push_segment(&mut path, "items");
        assert_eq!(path, "/properties/foo/items");
    }

    #[test]
    fn empty_segment_produces_slash() {
        let mut path = String::new();
        push_segment(&mut path, "");
        assert_eq!(path, "/");
    }

    #[test]
    fn segments_unescape_in_rfc_order() {
        assert_eq!(
            segments("/a~1b/~01").expect("valid pointer"),
            vec!["a/b".to_string(), "~1".to_string()]
        );
    }

    #[test]
    fn segments_reject_relative_pointer() {
        assert!(segments("definitions/a").is_none());
    }

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let doc = json!({ "allOf": [ { "title": "first" }, { "title": "second" } ] });
        assert_eq!(lookup(&doc, "/allOf/1/title"), Some(&json!("second")));
        assert_eq!(lookup(&doc, ""), Some(&doc));
        assert!(lookup(&doc, "/allOf/7").is_none());
        assert!(lookup(&doc, "/missing").is_none());
    }

    #[test]
    fn percent_decode_handles_escapes() {
        assert_eq!(percent_decode("/definitions/a%20b"), "/definitions/a b");
        assert_eq!(percent_decode("/x%2"), "/x%2");
    }
}
