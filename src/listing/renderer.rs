use crate::encode;
use crate::html::{HtmlElement, HyperLink};
use crate::labels::Labels;
use crate::listing::filesystem::FileEntry;
use crate::request::Request;

/// Decides how each listing row's name cell is displayed.
///
/// Returning `None` from any method drops that row from the listing.
/// `link_path` is the path in request space, i.e. what a link back to the
/// listing handler must carry to show that directory.
pub trait FileListRenderer {
    fn parent_name(&self, link_path: &str, request: &Request, labels: &Labels) -> Option<String> {
        let link = HyperLink::new(
            format!("{}{}", request.script_path(), encode::url_path(link_path)),
            "../",
        )
        .with_title(labels.get("parent"));
        Some(link.to_html())
    }

    fn directory_name(
        &self,
        entry: &FileEntry,
        link_path: &str,
        request: &Request,
    ) -> Option<String> {
        let link = HyperLink::new(
            format!("{}{}", request.script_path(), encode::url_path(link_path)),
            entry.name.as_str(),
        );
        Some(link.to_html())
    }

    fn file_name(&self, entry: &FileEntry, _request: &Request) -> Option<String> {
        Some(encode::html(&entry.name))
    }
}

/// Links directories back to the handler and shows file names as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl FileListRenderer for DefaultRenderer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directory_link_points_at_handler() {
        let request = Request::new("/files");
        let entry = FileEntry::directory("/my docs");
        let name = DefaultRenderer
            .directory_name(&entry, "/my docs", &request)
            .unwrap();
        assert_eq!(name, "<a href=\"/files/my%20docs\">my docs</a>");
    }

    #[test]
    fn default_file_name_is_escaped_text() {
        let request = Request::new("/files");
        let entry = FileEntry::file("/a<b>.txt", 1);
        assert_eq!(
            DefaultRenderer.file_name(&entry, &request).unwrap(),
            "a&lt;b&gt;.txt"
        );
    }

    #[test]
    fn default_parent_link() {
        let request = Request::new("/files");
        let name = DefaultRenderer
            .parent_name("/", &request, &Labels::default())
            .unwrap();
        assert_eq!(name, "<a href=\"/files/\" title=\"Parent\">../</a>");
    }
}
