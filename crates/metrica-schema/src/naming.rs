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

//! Metric name clean-up helpers

/// Makes a metric name usable as the value of the `name` tag.
///
/// Tag values may not start with `~`, so a leading run of `~` is stripped.
/// A name made only of `~` becomes the empty string.
///
/// # Examples
///
/// ```
/// use metrica_schema::sanitize_name_as_tag_value;
///
/// assert_eq!(sanitize_name_as_tag_value("~~~foo"), "foo");
/// assert_eq!(sanitize_name_as_tag_value("~~~"), "");
/// assert_eq!(sanitize_name_as_tag_value("a~b"), "a~b");
/// ```
pub fn sanitize_name_as_tag_value(name: &str) -> &str {
    name.trim_start_matches('~')
}

/// Removes leading and trailing dots and collapses runs of interior dots.
///
/// # Examples
///
/// ```
/// use metrica_schema::collapse_dots;
///
/// assert_eq!(collapse_dots("a..b...c."), "a.b.c");
/// assert_eq!(collapse_dots("..."), "");
/// ```
pub fn collapse_dots(name: &str) -> String {
    let trimmed = name.trim_matches('.');
    let mut out = String::with_capacity(trimmed.len());
    let mut prev_dot = false;

    for c in trimmed.chars() {
        if c == '.' {
            if !prev_dot {
                out.push('.');
            }
            prev_dot = true;
        } else {
            out.push(c);
            prev_dot = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_leading_tildes() {
        assert_eq!(sanitize_name_as_tag_value("~~~foo"), "foo");
        assert_eq!(sanitize_name_as_tag_value("~foo~bar"), "foo~bar");
        assert_eq!(sanitize_name_as_tag_value("foo"), "foo");
    }

    #[test]
    fn test_sanitize_only_tildes() {
        assert_eq!(sanitize_name_as_tag_value("~~~"), "");
        assert_eq!(sanitize_name_as_tag_value(""), "");
    }

    #[test]
    fn test_collapse_dots() {
        let cases = [
            ("a..b...c.", "a.b.c"),
            ("...", ""),
            ("", ""),
            (".a.b.", "a.b"),
            ("a.b.c", "a.b.c"),
            ("..a....b..", "a.b"),
            ("ü..ö", "ü.ö"),
        ];
        for (input, expected) in cases {
            assert_eq!(collapse_dots(input), expected, "input {:?}", input);
        }
    }
}
