use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// "0.3.2" for releases, "0.3.2@abc1234" for dev builds.
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const BUILD: &str = env!("DRAFTPAD_BUILD");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if BUILD.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, BUILD)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "draftpad", bin_name = "draftpad", version = version())]
#[command(about = "Markdown drafts with live preview and autosave", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug logging on stderr (overrides DRAFTPAD_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List documents, newest first
    #[command(alias = "ls")]
    List {
        /// Only titles containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Search document titles
    Search { term: String },

    /// Print a document
    #[command(alias = "v")]
    View {
        /// Index, id prefix or title
        selector: String,
    },

    /// Rename a document
    Rename {
        /// Index, id prefix or title
        selector: String,

        /// New title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Delete a document permanently
    #[command(alias = "rm")]
    Delete {
        /// Index, id prefix or title
        selector: String,
    },

    /// Print the autosaved buffer
    Recover,

    /// Render a markdown file to html on stdout
    Render { file: PathBuf },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. preview-debounce)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Edit interactively, reading lines from stdin
    #[command(alias = "e")]
    Edit {
        /// Document to open (default: recover the autosaved buffer)
        selector: Option<String>,
    },
}
