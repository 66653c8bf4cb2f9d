//! Leaf markup elements composed by the tree and the directory listing.

pub mod image;
pub mod link;
pub mod table;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use image::HtmlImage;
pub use link::HyperLink;
pub use table::{HorizontalAlign, HtmlTable, HtmlTableCell, HtmlTableRow, VerticalAlign, Width};
pub use text::HtmlText;

/// Anything that renders itself to an HTML fragment.
pub trait HtmlElement {
    fn to_html(&self) -> String;
}

/// Text direction for the `dir` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ltr" => Ok(Direction::Ltr),
            "rtl" => Ok(Direction::Rtl),
            _ => Err(Error::invalid("direction", s)),
        }
    }
}

/// Render ` lang="..." dir="..."` for whichever of the two is set.
pub(crate) fn language_attributes(lang: Option<&str>, dir: Option<Direction>) -> String {
    let mut out = String::new();
    if let Some(lang) = lang {
        out.push_str(&format!(" lang=\"{}\"", crate::encode::html(lang)));
    }
    if let Some(dir) = dir {
        out.push_str(&format!(" dir=\"{}\"", dir));
    }
    out
}
