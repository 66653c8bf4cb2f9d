use crate::encode;
use crate::html::HtmlElement;

/// An `<a>` element with an ordered set of query parameters.
///
/// Parameters are kept apart from `href` so a link can be re-pointed at a
/// different node or path without re-parsing the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HyperLink {
    href: String,
    text: String,
    target: Option<String>,
    title: Option<String>,
    params: Vec<(String, String)>,
}

impl HyperLink {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn set_href(&mut self, href: impl Into<String>) {
        self.href = href.into();
    }

    /// The unescaped link text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set `name` to `value`, replacing an existing parameter of that name in place.
    pub fn set_parameter(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `href` with the query parameters appended.
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            return self.href.clone();
        }
        let query = encode::query(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let sep = if self.href.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.href, sep, query)
    }

    /// Render the anchor around caller-supplied markup instead of the link text.
    pub fn wrap(&self, inner_html: &str) -> String {
        let mut out = format!("<a href=\"{}\"", encode::html(&self.url()));
        if let Some(target) = &self.target {
            out.push_str(&format!(" target=\"{}\"", encode::html(target)));
        }
        if let Some(title) = &self.title {
            out.push_str(&format!(" title=\"{}\"", encode::html(title)));
        }
        out.push('>');
        out.push_str(inner_html);
        out.push_str("</a>");
        out
    }
}

impl HtmlElement for HyperLink {
    fn to_html(&self) -> String {
        self.wrap(&encode::html(&self.text))
    }
}
