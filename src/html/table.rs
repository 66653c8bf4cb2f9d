use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::html::{language_attributes, Direction, HtmlElement};

/// Horizontal alignment of a cell or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl HorizontalAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
            HorizontalAlign::Justify => "justify",
        }
    }
}

impl FromStr for HorizontalAlign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(HorizontalAlign::Left),
            "center" => Ok(HorizontalAlign::Center),
            "right" => Ok(HorizontalAlign::Right),
            "justify" => Ok(HorizontalAlign::Justify),
            _ => Err(Error::invalid("align", s)),
        }
    }
}

/// Vertical alignment of a cell or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
    Baseline,
}

impl VerticalAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
            VerticalAlign::Baseline => "baseline",
        }
    }
}

impl FromStr for VerticalAlign {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(VerticalAlign::Top),
            "middle" => Ok(VerticalAlign::Middle),
            "bottom" => Ok(VerticalAlign::Bottom),
            "baseline" => Ok(VerticalAlign::Baseline),
            _ => Err(Error::invalid("valign", s)),
        }
    }
}

/// Width attribute, absolute or relative to the container.
///
/// Percentages only come from [`Width::percent`], so they never exceed 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Width(Extent);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    Pixels(u32),
    Percent(u8),
}

impl Width {
    pub fn pixels(value: u32) -> Self {
        Width(Extent::Pixels(value))
    }

    /// A percentage width; anything above 100 is rejected.
    pub fn percent(value: u32) -> Result<Self> {
        match u8::try_from(value) {
            Ok(p) if p <= 100 => Ok(Width(Extent::Percent(p))),
            _ => Err(Error::invalid("width", format!("{}%", value))),
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self.0, Extent::Percent(_))
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Extent::Pixels(px) => write!(f, "{}", px),
            Extent::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// A `<td>` or `<th>` holding pre-rendered markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTableCell {
    content: String,
    header: bool,
    align: Option<HorizontalAlign>,
    valign: Option<VerticalAlign>,
    width: Option<Width>,
    col_span: u32,
    no_wrap: bool,
}

impl HtmlTableCell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            col_span: 1,
            ..Default::default()
        }
    }

    pub fn from_element(element: &dyn HtmlElement) -> Self {
        Self::new(element.to_html())
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self {
            header: true,
            ..Self::new(content)
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    pub fn no_wrap(mut self) -> Self {
        self.no_wrap = true;
        self
    }

    /// Span `span` columns; zero is rejected.
    pub fn set_col_span(&mut self, span: u32) -> Result<()> {
        if span == 0 {
            return Err(Error::invalid("colspan", "0"));
        }
        self.col_span = span;
        Ok(())
    }
}

impl HtmlElement for HtmlTableCell {
    fn to_html(&self) -> String {
        let tag = if self.header { "th" } else { "td" };
        let mut out = format!("<{}", tag);
        if let Some(align) = self.align {
            out.push_str(&format!(" align=\"{}\"", align.as_str()));
        }
        if let Some(valign) = self.valign {
            out.push_str(&format!(" valign=\"{}\"", valign.as_str()));
        }
        if let Some(width) = self.width {
            out.push_str(&format!(" width=\"{}\"", width));
        }
        if self.col_span > 1 {
            out.push_str(&format!(" colspan=\"{}\"", self.col_span));
        }
        if self.no_wrap {
            out.push_str(" nowrap");
        }
        out.push('>');
        out.push_str(&self.content);
        out.push_str(&format!("</{}>", tag));
        out
    }
}

/// A `<tr>` of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTableRow {
    cells: Vec<HtmlTableCell>,
    align: Option<HorizontalAlign>,
    valign: Option<VerticalAlign>,
}

impl HtmlTableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(mut self, cell: HtmlTableCell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn add_cell(&mut self, cell: HtmlTableCell) {
        self.cells.push(cell);
    }

    pub fn with_valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn cells(&self) -> &[HtmlTableCell] {
        &self.cells
    }
}

impl HtmlElement for HtmlTableRow {
    fn to_html(&self) -> String {
        let mut out = String::from("<tr");
        if let Some(align) = self.align {
            out.push_str(&format!(" align=\"{}\"", align.as_str()));
        }
        if let Some(valign) = self.valign {
            out.push_str(&format!(" valign=\"{}\"", valign.as_str()));
        }
        out.push_str(">\n");
        for cell in &self.cells {
            out.push_str(&cell.to_html());
            out.push('\n');
        }
        out.push_str("</tr>\n");
        out
    }
}

/// A `<table>` with an optional header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    header: Vec<HtmlTableCell>,
    rows: Vec<HtmlTableRow>,
    border: u32,
    cell_padding: Option<u32>,
    cell_spacing: Option<u32>,
    width: Option<Width>,
    lang: Option<String>,
    dir: Option<Direction>,
}

impl HtmlTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn with_cell_padding(mut self, padding: u32) -> Self {
        self.cell_padding = Some(padding);
        self
    }

    pub fn with_cell_spacing(mut self, spacing: u32) -> Self {
        self.cell_spacing = Some(spacing);
        self
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    pub fn set_language(&mut self, lang: Option<String>, dir: Option<Direction>) {
        self.lang = lang;
        self.dir = dir;
    }

    pub fn set_header(&mut self, header: Vec<HtmlTableCell>) {
        self.header = header;
    }

    pub fn add_row(&mut self, row: HtmlTableRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[HtmlTableRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl HtmlElement for HtmlTable {
    fn to_html(&self) -> String {
        let mut out = String::from("<table");
        if self.border > 0 {
            out.push_str(&format!(" border=\"{}\"", self.border));
        }
        if let Some(padding) = self.cell_padding {
            out.push_str(&format!(" cellpadding=\"{}\"", padding));
        }
        if let Some(spacing) = self.cell_spacing {
            out.push_str(&format!(" cellspacing=\"{}\"", spacing));
        }
        if let Some(width) = self.width {
            out.push_str(&format!(" width=\"{}\"", width));
        }
        out.push_str(&language_attributes(self.lang.as_deref(), self.dir));
        out.push_str(">\n");
        if !self.header.is_empty() {
            let header = HtmlTableRow {
                cells: self.header.clone(),
                ..Default::default()
            };
            out.push_str(&header.to_html());
        }
        for row in &self.rows {
            out.push_str(&row.to_html());
        }
        out.push_str("</table>\n");
        out
    }
}
