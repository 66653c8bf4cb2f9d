//! Directory listing: one table row per child of the requested directory,
//! directories first, each group optionally collated by name.

pub mod filesystem;
pub mod formatter;
pub mod renderer;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use log::{debug, error, warn};

use crate::error::{Error, Result};
use crate::events::{Observers, PropertyChange};
use crate::html::HorizontalAlign;
use crate::labels::Labels;
use crate::request::Request;
use crate::sort::{self, Collator};

use filesystem::{
    join, normalize, parent, DirectoryHandle, FileEntry, LocalDirectory, PatternMode,
    RemoteDirectory, RemoteSystem,
};
use formatter::{Column, RowFormatter};
use renderer::{DefaultRenderer, FileListRenderer};

/// Modification times are always shown in this pattern, whatever the caller's locale.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// A virtual mount: request paths under `/<name>` are served from `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub name: String,
    pub path: String,
}

impl Share {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

enum Root {
    Local(PathBuf),
    Remote(Box<dyn RemoteSystem>),
}

/// Lists one directory per request.
pub struct DirectoryListing {
    root: Option<Root>,
    share: Option<Share>,
    pattern_mode: Option<PatternMode>,
    path_param: Option<String>,
    sort: bool,
    collator: Option<Collator>,
    labels: Labels,
    renderer: Box<dyn FileListRenderer>,
    observers: Observers,
}

impl Default for DirectoryListing {
    fn default() -> Self {
        Self {
            root: None,
            share: None,
            pattern_mode: None,
            path_param: None,
            sort: true,
            collator: None,
            labels: Labels::default(),
            renderer: Box::new(DefaultRenderer),
            observers: Observers::default(),
        }
    }
}

impl DirectoryListing {
    /// A listing with no root; `list` fails until one is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// List the local directory tree under `base`.
    pub fn local(base: &Path) -> Self {
        Self {
            root: Some(Root::Local(base.to_path_buf())),
            ..Self::default()
        }
    }

    /// List through a remote filesystem.
    pub fn remote(system: Box<dyn RemoteSystem>) -> Self {
        Self {
            root: Some(Root::Remote(system)),
            ..Self::default()
        }
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn FileListRenderer>) {
        self.renderer = renderer;
    }

    pub fn set_labels(&mut self, labels: Labels) {
        self.labels = labels;
    }

    /// Read the path from query parameter `name` instead of the path info.
    pub fn set_path_param(&mut self, name: Option<String>) {
        self.path_param = name;
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    pub fn is_sorted(&self) -> bool {
        self.sort
    }

    pub fn set_sort(&mut self, sort: bool) -> bool {
        let current = self.sort;
        self.observers
            .change(PropertyChange::new("sort", current, sort), || self.sort = sort)
    }

    /// Collate names for `locale`; an unusable tag falls back to ordinal order.
    pub fn set_locale(&mut self, locale: Option<&str>) -> bool {
        let current = self
            .collator
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        let collator = Collator::for_locale(locale);
        self.observers.change(
            PropertyChange::new("locale", current, locale.unwrap_or_default()),
            || self.collator = collator,
        )
    }

    pub fn share(&self) -> Option<&Share> {
        self.share.as_ref()
    }

    pub fn set_share(&mut self, share: Option<Share>) -> bool {
        let describe =
            |s: Option<&Share>| s.map(|s| format!("{}={}", s.name, s.path)).unwrap_or_default();
        let change = PropertyChange::new(
            "share",
            describe(self.share.as_ref()),
            describe(share.as_ref()),
        );
        self.observers.change(change, || self.share = share)
    }

    pub fn set_pattern_mode(&mut self, mode: Option<PatternMode>) -> bool {
        let describe = |m: Option<PatternMode>| m.map(|m| m.to_string()).unwrap_or_default();
        let change =
            PropertyChange::new("pattern_mode", describe(self.pattern_mode), describe(mode));
        self.observers.change(change, || self.pattern_mode = mode)
    }

    /// Render the requested directory through `formatter`.
    ///
    /// Returns an empty string when there is nothing to show, or when the
    /// formatter rejects a row.
    pub fn list(&self, request: &Request, formatter: &mut dyn RowFormatter) -> Result<String> {
        let root = self.root.as_ref().ok_or(Error::PropertyNotSet("root"))?;
        let request_path = self.request_path(request);
        let (link_path, real_path) = self.resolve(&request_path);
        debug!("listing {} (real path {})", link_path, real_path);

        let children = match root {
            Root::Local(base) => LocalDirectory::new(base, &real_path).list_children()?,
            Root::Remote(system) => {
                let mut handle = RemoteDirectory::new(system.as_ref(), &real_path);
                if let Some(mode) = self.pattern_mode {
                    if let Err(e) = handle.set_pattern_mode(mode) {
                        warn!("{}; using {} matching", e, handle.pattern_mode());
                    }
                }
                handle.list_children()?
            }
        };

        let (mut dirs, mut files): (Vec<FileEntry>, Vec<FileEntry>) =
            children.into_iter().partition(|e| e.is_directory);
        if self.sort {
            sort::sort(self.collator.as_ref(), &mut dirs);
            sort::sort(self.collator.as_ref(), &mut files);
        }

        formatter.set_columns(self.columns());
        if let Err(e) = self.add_rows(request, &link_path, &dirs, &files, formatter) {
            error!("listing of {} abandoned: {}", link_path, e);
            return Ok(String::new());
        }
        if formatter.row_count() == 0 {
            return Ok(String::new());
        }
        Ok(formatter.to_markup())
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new(self.labels.get("name"), HorizontalAlign::Left),
            Column::new(self.labels.get("size"), HorizontalAlign::Right),
            Column::new(self.labels.get("type"), HorizontalAlign::Left),
            Column::new(self.labels.get("modified"), HorizontalAlign::Left),
        ]
    }

    /// `link_path` is the listed directory in request space; row links extend it.
    fn add_rows(
        &self,
        request: &Request,
        link_path: &str,
        dirs: &[FileEntry],
        files: &[FileEntry],
        formatter: &mut dyn RowFormatter,
    ) -> Result<()> {
        if let Some(parent_path) = self.parent_link_path(link_path) {
            if let Some(name) = self.renderer.parent_name(&parent_path, request, &self.labels) {
                formatter.add_row(vec![name, String::new(), String::new(), String::new()])?;
            }
        }

        for dir in dirs {
            let dir_link = join(link_path, &dir.name);
            let Some(name) = self.renderer.directory_name(dir, &dir_link, request) else {
                continue;
            };
            formatter.add_row(vec![
                name,
                String::new(),
                self.labels.get("directory").to_string(),
                format_timestamp(dir.modified),
            ])?;
        }

        for file in files {
            let Some(name) = self.renderer.file_name(file, request) else {
                continue;
            };
            formatter.add_row(vec![
                name,
                file.length.to_string(),
                self.labels.get("file").to_string(),
                format_timestamp(file.modified),
            ])?;
        }
        Ok(())
    }

    fn request_path(&self, request: &Request) -> String {
        let raw = match &self.path_param {
            Some(name) => request.param(name),
            None => request.path_info(),
        };
        normalize(raw.unwrap_or("/"))
    }

    /// Split a request path into the path links are built from and the path
    /// that is actually listed.
    ///
    /// With a share, request space is rooted at `/<share name>`: a leading
    /// segment equal to the share name is stripped, anything else is taken
    /// relative to the share root, and links always carry the share name.
    fn resolve(&self, request_path: &str) -> (String, String) {
        let Some(share) = &self.share else {
            return (request_path.to_string(), request_path.to_string());
        };
        let relative = request_path.trim_start_matches('/');
        let rest = match relative.split_once('/') {
            Some((head, rest)) if head == share.name => rest,
            None if relative == share.name => "",
            _ => relative,
        };
        let mount = normalize(&share.name);
        if rest.is_empty() {
            (mount, normalize(&share.path))
        } else {
            (
                normalize(&join(&mount, rest)),
                normalize(&join(&share.path, rest)),
            )
        }
    }

    /// Where the parent row links to; nothing above the share root.
    fn parent_link_path(&self, link_path: &str) -> Option<String> {
        let parent = parent(link_path)?;
        if self.share.is_some() && parent == "/" {
            return None;
        }
        Some(parent)
    }
}

/// Format a modification time as local `MM/dd/yyyy hh:mm:ss AM`.
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    match time {
        Some(t) => DateTime::<Local>::from(t).format(TIMESTAMP_FORMAT).to_string(),
        None => String::new(),
    }
}
