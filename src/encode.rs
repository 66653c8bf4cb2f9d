//! HTML and URL encoding helpers shared by every element.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'&')
    .add(b'\'');

/// Escape text for use in element content or a quoted attribute value.
pub fn html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode every segment of a `/`-separated path, keeping the separators.
pub fn url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Encode `(name, value)` pairs as an `application/x-www-form-urlencoded` query.
pub fn query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_markup_characters() {
        assert_eq!(
            html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn html_leaves_plain_text_alone() {
        assert_eq!(html("café 42"), "café 42");
    }

    #[test]
    fn url_path_keeps_separators() {
        assert_eq!(url_path("/docs/my file.txt"), "/docs/my%20file.txt");
        assert_eq!(url_path("/a&b/c?d"), "/a%26b/c%3Fd");
    }

    #[test]
    fn query_serializes_pairs_in_order() {
        assert_eq!(
            query([("hashcode", "42"), ("action", "expand")]),
            "hashcode=42&action=expand"
        );
        assert_eq!(query([("q", "a b")]), "q=a+b");
    }
}
