//! Configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--locale`, `--no-sort`, etc.)
//! 2. `$WEBTREE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.webtree.toml` in the current working directory
//! 4. Global `~/.config/webtree/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::labels::Labels;
use crate::listing::filesystem::PatternMode;
use crate::listing::{DirectoryListing, Share};
use crate::tree::{HtmlTree, TreeIcons, DEFAULT_TOKEN_PARAM};

// ── Section configs ──────────────────────────────────────────────────────────

/// Tree rendering settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Image shown on expanded branches (text `-` when unset).
    pub expanded_icon: Option<String>,
    /// Image shown on collapsed branches (text `+` when unset).
    pub collapsed_icon: Option<String>,
    /// Image shown beside leaves.
    pub doc_icon: Option<String>,
    /// Collate top-level elements.
    pub sort: Option<bool>,
    /// BCP-47 tag used for collation.
    pub locale: Option<String>,
    /// Query parameter carrying the selection token.
    pub token_param: Option<String>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    pub sort: Option<bool>,
    pub locale: Option<String>,
    /// Query parameter to read the path from instead of the path info.
    pub path_param: Option<String>,
    /// Share mount: request prefix and the real path it maps to.
    pub share_name: Option<String>,
    pub share_path: Option<String>,
    /// Wildcard mode for remote systems: "posix", "posix-all", "os2".
    pub pattern_mode: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tree: TreeConfig,
    pub listing: ListingConfig,
    pub labels: Labels,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config file paths in priority order, excluding `--config`.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("WEBTREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".webtree.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("webtree").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!("failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            tree: TreeConfig {
                expanded_icon: other
                    .tree
                    .expanded_icon
                    .clone()
                    .or(self.tree.expanded_icon),
                collapsed_icon: other
                    .tree
                    .collapsed_icon
                    .clone()
                    .or(self.tree.collapsed_icon),
                doc_icon: other.tree.doc_icon.clone().or(self.tree.doc_icon),
                sort: other.tree.sort.or(self.tree.sort),
                locale: other.tree.locale.clone().or(self.tree.locale),
                token_param: other.tree.token_param.clone().or(self.tree.token_param),
            },
            listing: ListingConfig {
                sort: other.listing.sort.or(self.listing.sort),
                locale: other.listing.locale.clone().or(self.listing.locale),
                path_param: other
                    .listing
                    .path_param
                    .clone()
                    .or(self.listing.path_param),
                share_name: other
                    .listing
                    .share_name
                    .clone()
                    .or(self.listing.share_name),
                share_path: other
                    .listing
                    .share_path
                    .clone()
                    .or(self.listing.share_path),
                pattern_mode: other
                    .listing
                    .pattern_mode
                    .clone()
                    .or(self.listing.pattern_mode),
            },
            labels: self.labels.merge(&other.labels),
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn tree_icons(&self) -> TreeIcons {
        TreeIcons {
            expanded: self.tree.expanded_icon.clone(),
            collapsed: self.tree.collapsed_icon.clone(),
            document: self.tree.doc_icon.clone(),
        }
    }

    pub fn tree_sort(&self) -> bool {
        self.tree.sort.unwrap_or(true)
    }

    pub fn token_param(&self) -> &str {
        self.tree
            .token_param
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_PARAM)
    }

    pub fn listing_sort(&self) -> bool {
        self.listing.sort.unwrap_or(true)
    }

    /// The share mount, if both halves are configured.
    pub fn share(&self) -> Option<Share> {
        match (&self.listing.share_name, &self.listing.share_path) {
            (Some(name), Some(path)) => Some(Share::new(name.clone(), path.clone())),
            _ => None,
        }
    }

    /// Configured wildcard mode; an unknown value is logged and ignored.
    pub fn pattern_mode(&self) -> Option<PatternMode> {
        let raw = self.listing.pattern_mode.as_deref()?;
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                warn!("ignoring configured pattern mode: {}", e);
                None
            }
        }
    }

    /// Apply the `[tree]` section to `tree`.
    pub fn configure_tree(&self, tree: &mut HtmlTree) {
        tree.set_icons(self.tree_icons());
        tree.set_sort(self.tree_sort());
        tree.set_locale(self.tree.locale.as_deref());
        tree.set_token_param(self.token_param());
    }

    /// Apply the `[listing]` and `[labels]` sections to `listing`.
    pub fn configure_listing(&self, listing: &mut DirectoryListing) {
        listing.set_sort(self.listing_sort());
        listing.set_locale(self.listing.locale.as_deref());
        listing.set_path_param(self.listing.path_param.clone());
        listing.set_share(self.share());
        listing.set_pattern_mode(self.pattern_mode());
        listing.set_labels(self.labels.clone());
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
