use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use webtree::config::{AppConfig, ListingConfig, TreeConfig};
use webtree::error::{Error, Result};
use webtree::html::HyperLink;
use webtree::listing::formatter::HtmlTableFormatter;
use webtree::listing::DirectoryListing;
use webtree::request::Request;
use webtree::tree::{self, HtmlTree};

/// Render directory listings and expandable trees as HTML fragments.
#[derive(Parser, Debug)]
#[command(name = "webtree", version, about)]
struct Cli {
    /// Explicit config file (highest priority after flags)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale used to collate names (e.g. "en", "fr-CA")
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Keep names in filesystem order
    #[arg(long, global = true)]
    no_sort: bool,

    /// URL of the handler that generated links point back to
    #[arg(long, global = true, default_value = "")]
    script: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a table listing one directory
    List {
        /// Directory that request paths are resolved under
        root: PathBuf,

        /// Request path to list
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Print an expandable tree of a directory
    Tree {
        /// Directory to mirror
        root: PathBuf,

        /// Levels of subdirectories to load
        #[arg(long, default_value_t = 2)]
        depth: usize,

        /// Selection tokens to apply, one render per token
        #[arg(long)]
        select: Vec<u64>,
    },
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        let sort = self.no_sort.then_some(false);
        AppConfig {
            tree: TreeConfig {
                sort,
                locale: self.locale.clone(),
                ..Default::default()
            },
            listing: ListingConfig {
                sort,
                locale: self.locale.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let html = match &cli.command {
        Command::List { root, path } => {
            let root = canonical(root)?;
            let mut listing = DirectoryListing::local(&root);
            config.configure_listing(&mut listing);
            let request = Request::new(cli.script.as_str()).with_path_info(path.as_str());
            listing.list(&request, &mut HtmlTableFormatter::new().with_border(1))?
        }
        Command::Tree {
            root,
            depth,
            select,
        } => {
            let root = canonical(root)?;
            let mut node = tree::load_directory(&root, "/", *depth, &cli.script)?;
            node.set_icon_link(HyperLink::new(cli.script.as_str(), ""));
            node.set_expanded(true);

            let mut html_tree = HtmlTree::new();
            config.configure_tree(&mut html_tree);
            html_tree.add_element(node);

            let mut html = html_tree.render(&Request::new(cli.script.as_str()))?;
            for token in select {
                let request = Request::new(cli.script.as_str())
                    .with_param(html_tree.token_param().to_string(), token.to_string());
                html = html_tree.render(&request)?;
            }
            html
        }
    };

    print!("{}", html);
    Ok(())
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|_| Error::InvalidPath(format!("{} does not exist", path.display())))
}
