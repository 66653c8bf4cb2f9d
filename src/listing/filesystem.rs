//! Directory handles the listing reads from: a local directory tree or a
//! remote system reached through [`RemoteSystem`].
//!
//! Paths are logical, `/`-rooted and `/`-separated regardless of platform.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use glob::{MatchOptions, Pattern};
use log::debug;

use crate::error::{Error, Result};
use crate::sort::SortKey;

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    /// Logical path of the entry.
    pub path: String,
    pub is_directory: bool,
    pub length: u64,
    pub modified: Option<SystemTime>,
}

impl FileEntry {
    pub fn file(path: &str, length: u64) -> Self {
        Self::new(path, false, length)
    }

    pub fn directory(path: &str) -> Self {
        Self::new(path, true, 0)
    }

    fn new(path: &str, is_directory: bool, length: u64) -> Self {
        let path = normalize(path);
        Self {
            name: file_name(&path).to_string(),
            path,
            is_directory,
            length,
            modified: None,
        }
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }
}

impl SortKey for FileEntry {
    fn sort_key(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed(&self.name)
    }
}

/// A directory that can enumerate its immediate children.
pub trait DirectoryHandle {
    /// Logical path of this directory.
    fn path(&self) -> &str;

    fn list_children(&self) -> io::Result<Vec<FileEntry>>;

    /// Logical path of the parent directory, `None` at the root.
    fn parent(&self) -> Option<String> {
        parent(self.path())
    }
}

/// Collapse `.`/`..`/empty segments into a `/`-rooted path. `..` never climbs above `/`.
///
/// Only `/` separates segments; a backslash is an ordinary name character.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Parent of a normalized path.
pub fn parent(path: &str) -> Option<String> {
    let path = normalize(path);
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(i) => Some(path[..i].to_string()),
        None => None,
    }
}

/// Join a child name onto a logical directory path.
pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ── Local ────────────────────────────────────────────────────────────────────

/// A directory on the local filesystem, addressed relative to `base`.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    base: PathBuf,
    path: String,
}

impl LocalDirectory {
    pub fn new(base: &Path, path: &str) -> Self {
        Self {
            base: base.to_path_buf(),
            path: normalize(path),
        }
    }

    /// The real location on disk.
    pub fn real_path(&self) -> PathBuf {
        let relative = self.path.trim_start_matches('/');
        if relative.is_empty() {
            self.base.clone()
        } else {
            self.base.join(relative)
        }
    }
}

impl DirectoryHandle for LocalDirectory {
    fn path(&self) -> &str {
        &self.path
    }

    /// Symlinks are followed as long as their target stays under the base
    /// directory; links leading out of it are skipped and cannot be listed.
    /// Dangling links show up as files. Unreadable entries are skipped.
    fn list_children(&self) -> io::Result<Vec<FileEntry>> {
        let base = fs::canonicalize(&self.base)?;
        let dir = fs::canonicalize(self.real_path())?;
        if !dir.starts_with(&base) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} resolves outside the listing root", self.path),
            ));
        }

        let mut children = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let Some(metadata) = entry_metadata(&entry, &base) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();
            children.push(FileEntry {
                path: join(&self.path, &name),
                name,
                is_directory: metadata.is_dir(),
                length: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }
        Ok(children)
    }
}

/// Metadata of `entry`, or of its target when it is a symlink under `base`.
fn entry_metadata(entry: &fs::DirEntry, base: &Path) -> Option<fs::Metadata> {
    let own = entry.metadata().ok()?;
    if !own.is_symlink() {
        return Some(own);
    }
    match fs::canonicalize(entry.path()) {
        Ok(target) if target.starts_with(base) => fs::metadata(&target).ok(),
        Ok(target) => {
            debug!(
                "skipping {}: link target {} is outside the listing root",
                entry.path().display(),
                target.display()
            );
            None
        }
        Err(_) => Some(own),
    }
}

// ── Remote ───────────────────────────────────────────────────────────────────

/// How wildcard patterns are matched against remote names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternMode {
    /// Case-sensitive; `*` does not match a leading dot.
    #[default]
    Posix,
    /// Case-sensitive; `*` also matches dot-files.
    PosixAll,
    /// Case-insensitive; matches everything including dot-files.
    Os2,
}

impl PatternMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PatternMode::Posix => "posix",
            PatternMode::PosixAll => "posix-all",
            PatternMode::Os2 => "os2",
        }
    }

    fn match_options(self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self != PatternMode::Os2,
            require_literal_separator: true,
            require_literal_leading_dot: self == PatternMode::Posix,
        }
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "posix" => Ok(PatternMode::Posix),
            "posix-all" | "posix_all" => Ok(PatternMode::PosixAll),
            "os2" | "os/2" => Ok(PatternMode::Os2),
            _ => Err(Error::invalid("pattern_mode", s)),
        }
    }
}

/// A remote filesystem. `list` reports each child's kind in the same call,
/// so partitioning needs no per-entry round trip.
pub trait RemoteSystem {
    fn list(&self, path: &str) -> io::Result<Vec<FileEntry>>;

    fn supports(&self, _mode: PatternMode) -> bool {
        true
    }
}

/// A directory on a [`RemoteSystem`], filtered by a wildcard pattern.
pub struct RemoteDirectory<'a> {
    system: &'a dyn RemoteSystem,
    path: String,
    pattern: String,
    mode: PatternMode,
}

impl<'a> RemoteDirectory<'a> {
    pub fn new(system: &'a dyn RemoteSystem, path: &str) -> Self {
        Self {
            system,
            path: normalize(path),
            pattern: "*".to_string(),
            mode: PatternMode::default(),
        }
    }

    /// Only names matching the wildcard `pattern` are listed.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        Pattern::new(pattern).map_err(|_| Error::invalid("pattern", pattern))?;
        self.pattern = pattern.to_string();
        Ok(())
    }

    /// Switch wildcard semantics; modes the system rejects leave the current mode.
    pub fn set_pattern_mode(&mut self, mode: PatternMode) -> Result<()> {
        if !self.system.supports(mode) {
            return Err(Error::UnsupportedPatternMode(mode));
        }
        self.mode = mode;
        Ok(())
    }

    pub fn pattern_mode(&self) -> PatternMode {
        self.mode
    }
}

impl DirectoryHandle for RemoteDirectory<'_> {
    fn path(&self) -> &str {
        &self.path
    }

    fn list_children(&self) -> io::Result<Vec<FileEntry>> {
        let pattern = Pattern::new(&self.pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let options = self.mode.match_options();
        Ok(self
            .system
            .list(&self.path)?
            .into_iter()
            .filter(|e| pattern.matches_with(&e.name, options))
            .collect())
    }
}

/// A [`RemoteSystem`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySystem {
    entries: BTreeMap<String, FileEntry>,
    unsupported: Vec<PatternMode>,
}

impl MemorySystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, creating its ancestor directories.
    pub fn insert(&mut self, entry: FileEntry) {
        let mut dir = parent(&entry.path);
        while let Some(d) = dir {
            if d == "/" {
                break;
            }
            self.entries
                .entry(d.clone())
                .or_insert_with(|| FileEntry::directory(&d));
            dir = parent(&d);
        }
        self.entries.insert(entry.path.clone(), entry);
    }

    pub fn with(mut self, entry: FileEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Make `supports` reject `mode`.
    pub fn reject_mode(mut self, mode: PatternMode) -> Self {
        self.unsupported.push(mode);
        self
    }
}

impl RemoteSystem for MemorySystem {
    fn list(&self, path: &str) -> io::Result<Vec<FileEntry>> {
        let path = normalize(path);
        if path != "/" && !self.entries.get(&path).is_some_and(|e| e.is_directory) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", path),
            ));
        }
        Ok(self
            .entries
            .values()
            .filter(|e| parent(&e.path).as_deref() == Some(path.as_str()))
            .cloned()
            .collect())
    }

    fn supports(&self, mode: PatternMode) -> bool {
        !self.unsupported.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn normalize_collapses_segments() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("a/b/"), "/a/b");
        assert_eq!(normalize("/a/./b/../c"), "/a/c");
        assert_eq!(normalize("/../../etc"), "/etc");
        assert_eq!(normalize("/a\\b/c"), "/a\\b/c");
    }

    #[test]
    fn parent_of_paths() {
        assert_eq!(parent("/"), None);
        assert_eq!(parent("/a"), Some("/".to_string()));
        assert_eq!(parent("/a/b"), Some("/a".to_string()));
    }

    #[test]
    fn join_paths() {
        assert_eq!(join("/", "a"), "/a");
        assert_eq!(join("/a", "b"), "/a/b");
    }

    #[test]
    fn local_directory_lists_children() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let handle = LocalDirectory::new(dir.path(), "/");
        let mut children = handle.list_children().unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "a.txt");
        assert_eq!(children[0].path, "/a.txt");
        assert!(!children[0].is_directory);
        assert_eq!(children[0].length, 5);
        assert!(children[0].modified.is_some());
        assert_eq!(children[1].name, "sub");
        assert!(children[1].is_directory);
    }

    #[test]
    fn local_directory_cannot_escape_base() {
        let dir = TempDir::new().unwrap();
        let handle = LocalDirectory::new(dir.path(), "/../..");
        assert_eq!(handle.path(), "/");
        assert_eq!(handle.real_path(), dir.path());
    }

    #[test]
    fn local_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("plain")).unwrap();
        let handle = LocalDirectory::new(dir.path(), "/nope");
        assert!(handle.list_children().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn backslash_is_part_of_a_local_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a\\b")).unwrap();
        File::create(dir.path().join("a\\b").join("x")).unwrap();

        let root = LocalDirectory::new(dir.path(), "/");
        let children = root.list_children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path, "/a\\b");
        assert!(children[0].is_directory);

        let inner = LocalDirectory::new(dir.path(), &children[0].path);
        assert_eq!(inner.real_path(), dir.path().join("a\\b"));
        assert_eq!(names(inner.list_children().unwrap()), vec!["x"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_a_directory() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real").join("inside.txt"), "abc").unwrap();
        symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        symlink(dir.path().join("real").join("inside.txt"), dir.path().join("alias.txt"))
            .unwrap();

        let root = LocalDirectory::new(dir.path(), "/");
        let children = root.list_children().unwrap();
        let link = children.iter().find(|e| e.name == "link").unwrap();
        assert!(link.is_directory);
        let alias = children.iter().find(|e| e.name == "alias.txt").unwrap();
        assert!(!alias.is_directory);
        assert_eq!(alias.length, 3);

        let through_link = LocalDirectory::new(dir.path(), "/link");
        assert_eq!(names(through_link.list_children().unwrap()), vec!["inside.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn links_leaving_the_base_are_skipped() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        File::create(outside.path().join("secret")).unwrap();
        let dir = TempDir::new().unwrap();
        symlink(outside.path(), dir.path().join("out")).unwrap();
        File::create(dir.path().join("kept")).unwrap();

        let root = LocalDirectory::new(dir.path(), "/");
        assert_eq!(names(root.list_children().unwrap()), vec!["kept"]);

        let err = LocalDirectory::new(dir.path(), "/out")
            .list_children()
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_a_file() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

        let children = LocalDirectory::new(dir.path(), "/").list_children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "broken");
        assert!(!children[0].is_directory);
    }

    fn remote_fixture() -> MemorySystem {
        MemorySystem::new()
            .with(FileEntry::file("/docs/Readme.TXT", 10))
            .with(FileEntry::file("/docs/.profile", 3))
            .with(FileEntry::file("/docs/notes.txt", 7))
            .with(FileEntry::directory("/docs/img"))
    }

    fn names(entries: Vec<FileEntry>) -> Vec<String> {
        entries.into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn memory_system_creates_ancestors() {
        let system = remote_fixture();
        let root = system.list("/").unwrap();
        assert_eq!(names(root), vec!["docs"]);
        assert!(system.list("/docs/notes.txt").is_err());
    }

    #[test]
    fn posix_mode_hides_dot_files() {
        let system = remote_fixture();
        let handle = RemoteDirectory::new(&system, "/docs");
        let listed = names(handle.list_children().unwrap());
        assert!(!listed.contains(&".profile".to_string()));
        assert_eq!(listed.len(), 3);
    }

    #[test]
    fn posix_all_mode_shows_dot_files() {
        let system = remote_fixture();
        let mut handle = RemoteDirectory::new(&system, "/docs");
        handle.set_pattern_mode(PatternMode::PosixAll).unwrap();
        assert_eq!(handle.list_children().unwrap().len(), 4);
    }

    #[test]
    fn os2_mode_is_case_insensitive() {
        let system = remote_fixture();
        let mut handle = RemoteDirectory::new(&system, "/docs");
        handle.set_pattern("*.txt").unwrap();
        assert_eq!(names(handle.list_children().unwrap()), vec!["notes.txt"]);

        handle.set_pattern_mode(PatternMode::Os2).unwrap();
        let mut listed = names(handle.list_children().unwrap());
        listed.sort();
        assert_eq!(listed, vec!["Readme.TXT", "notes.txt"]);
    }

    #[test]
    fn rejected_mode_keeps_previous() {
        let system = remote_fixture().reject_mode(PatternMode::Os2);
        let mut handle = RemoteDirectory::new(&system, "/docs");
        let err = handle.set_pattern_mode(PatternMode::Os2).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPatternMode(PatternMode::Os2)));
        assert_eq!(handle.pattern_mode(), PatternMode::Posix);
    }

    #[test]
    fn malformed_pattern_rejected() {
        let system = remote_fixture();
        let mut handle = RemoteDirectory::new(&system, "/docs");
        assert!(handle.set_pattern("[unclosed").is_err());
        assert_eq!(handle.list_children().unwrap().len(), 3);
    }

    #[test]
    fn pattern_mode_parsing() {
        assert_eq!("POSIX".parse::<PatternMode>().unwrap(), PatternMode::Posix);
        assert_eq!(
            "posix-all".parse::<PatternMode>().unwrap(),
            PatternMode::PosixAll
        );
        assert_eq!("os2".parse::<PatternMode>().unwrap(), PatternMode::Os2);
        assert!("dos".parse::<PatternMode>().is_err());
    }
}
