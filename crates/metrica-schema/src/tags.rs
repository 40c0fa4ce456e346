// Metrica - metric identity and wire schema
// Copyright (C) 2025 Metrica Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Tag well-formedness checks
//!
//! A tag is a `key=value` string. The key ends at the first `=`, so the value
//! may itself contain further `=` characters. Keys may not contain any of
//! `; ! ^ =`; values may not start with `~` and may not contain `;`.

/// Prefix of the denormalized name alias tag
pub(crate) const NAME_TAG_PREFIX: &str = "name=";

const FORBIDDEN_KEY_CHARS: &[char] = &[';', '!', '^', '='];

/// Returns true if every tag in the set is valid
///
/// # Examples
///
/// ```
/// use metrica_schema::is_valid_tag_set;
///
/// assert!(is_valid_tag_set(&["a=b", "host=web-1"]));
/// assert!(!is_valid_tag_set(&["a=b", "broken"]));
/// ```
pub fn is_valid_tag_set<S: AsRef<str>>(tags: &[S]) -> bool {
    tags.iter().all(|t| is_valid_tag(t.as_ref()))
}

/// Returns true if `tag` has a non-empty key and value separated by `=`
pub fn is_valid_tag(tag: &str) -> bool {
    if tag.len() < 3 {
        return false;
    }

    let equal = match tag.find('=') {
        Some(pos) => pos,
        None => return false,
    };

    // first equal sign must be neither the first nor the last byte
    if equal == 0 || equal == tag.len() - 1 {
        return false;
    }

    is_valid_tag_key(&tag[..equal]) && is_valid_tag_value(&tag[equal + 1..])
}

/// Validates a tag key
pub fn is_valid_tag_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(FORBIDDEN_KEY_CHARS)
}

/// Validates a tag value
pub fn is_valid_tag_value(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('~') && !value.contains(';')
}

/// True for the `name=` alias tag, which never takes part in identity
/// or partitioning.
pub(crate) fn is_name_tag(tag: &str) -> bool {
    tag.len() > NAME_TAG_PREFIX.len() && tag.starts_with(NAME_TAG_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_validation_table() {
        let cases: &[(&[&str], bool)] = &[
            (&["abc=cba"], true),
            (&["a="], false),
            (&["a!="], false),
            (&["=abc"], false),
            (&["@#$%!=(*&"], false),
            (&["!@#$%=(*&"], false),
            (&["@#;$%=(*&"], false),
            (&["@#$%=(;*&"], false),
            (&["@#$%=(*&"], true),
            (&["@#$%=(*&", "abc=!fd", "a===="], true),
            (&["@#$%=(*&", "abc=!fd", "a===;="], false),
        ];

        for (tags, expected) in cases {
            assert_eq!(
                is_valid_tag_set(tags),
                *expected,
                "tags {:?} expected valid={}",
                tags,
                expected
            );
        }
    }

    #[test]
    fn test_value_may_not_start_with_tilde() {
        assert!(!is_valid_tag("key=~value"));
        assert!(is_valid_tag("key=va~lue"));
    }

    #[test]
    fn test_key_forbidden_chars() {
        assert!(!is_valid_tag_key("a^b"));
        assert!(!is_valid_tag_key(""));
        assert!(is_valid_tag_key("a.b-c_d"));
    }

    #[test]
    fn test_missing_equal_sign() {
        assert!(!is_valid_tag("abcdef"));
    }

    #[test]
    fn test_empty_set_is_valid() {
        let empty: [&str; 0] = [];
        assert!(is_valid_tag_set(&empty));
    }

    #[test]
    fn test_name_tag_detection() {
        assert!(is_name_tag("name=foo"));
        assert!(!is_name_tag("name="));
        assert!(!is_name_tag("names=foo"));
        assert!(!is_name_tag("host=name"));
    }
}
