use crate::encode;
use crate::html::HtmlElement;

/// A run of escaped text, optionally bold or italic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlText {
    text: String,
    bold: bool,
    italic: bool,
}

impl HtmlText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// The unescaped text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl HtmlElement for HtmlText {
    fn to_html(&self) -> String {
        let mut out = encode::html(&self.text);
        if self.italic {
            out = format!("<i>{}</i>", out);
        }
        if self.bold {
            out = format!("<b>{}</b>", out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(HtmlText::new("a < b").to_html(), "a &lt; b");
    }

    #[test]
    fn bold_wraps_italic() {
        let text = HtmlText::new("x").bold().italic();
        assert_eq!(text.to_html(), "<b><i>x</i></b>");
    }
}
