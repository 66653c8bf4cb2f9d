use crate::encode;
use crate::html::HtmlElement;

/// An `<img>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlImage {
    src: String,
    alt: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl HtmlImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn src(&self) -> &str {
        &self.src
    }
}

impl HtmlElement for HtmlImage {
    fn to_html(&self) -> String {
        let mut out = format!(
            "<img src=\"{}\" alt=\"{}\"",
            encode::html(&self.src),
            encode::html(&self.alt)
        );
        if let Some(w) = self.width {
            out.push_str(&format!(" width=\"{}\"", w));
        }
        if let Some(h) = self.height {
            out.push_str(&format!(" height=\"{}\"", h));
        }
        out.push_str(" border=\"0\" />");
        out
    }
}
