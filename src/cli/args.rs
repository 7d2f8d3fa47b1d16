//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--cwd <path>`: Resolve local files relative to this directory
//! - `--dev`: Force the local provider
//! - `--debug`: Enable debug logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Studio - commit content edits to GitHub, GitLab or Azure DevOps
#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Resolve local files relative to this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Dev mode: use the local provider, never touch the network
    #[arg(long, global = true)]
    pub dev: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the selected provider and repository
    Info,

    /// Print a file from the configured branch
    #[command(after_help = "\
EXAMPLES:
    # Print a markdown document
    studio fetch blog/hello.md

    # Print an image as base64, or decode a text file stored as base64
    studio fetch img/logo.png
    studio fetch notes.txt --decode")]
    Fetch {
        /// Path relative to the configured root directory
        path: String,

        /// Route the read through the adapter's in-memory cache. The cache
        /// lives only as long as this process, so a single invocation still
        /// hits the network once; the flag matters to in-process callers.
        #[arg(long)]
        cached: bool,

        /// Decode base64 content to text before printing
        #[arg(long)]
        decode: bool,
    },

    /// Commit local files as one atomic commit
    #[command(after_help = "\
EXAMPLES:
    # Update one document and add an image
    studio commit -m \"Update hello\" --modified blog/hello.md --created img/logo.png

    # Remove a document
    studio commit -m \"Remove draft\" --deleted blog/draft.md")]
    Commit {
        /// Commit message (the studio co-author trailer is appended)
        #[arg(short, long)]
        message: String,

        /// New files
        #[arg(long = "created", value_name = "PATH")]
        created: Vec<String>,

        /// Changed files
        #[arg(long = "modified", value_name = "PATH")]
        modified: Vec<String>,

        /// Files to delete
        #[arg(long = "deleted", value_name = "PATH")]
        deleted: Vec<String>,
    },

    /// Print a web URL for the repository
    Url {
        #[command(subcommand)]
        target: UrlTarget,

        /// Open the URL in a browser
        #[arg(long, global = true)]
        open: bool,
    },
}

/// What `studio url` points at.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    /// Repository root
    Repo,
    /// Configured branch
    Branch,
    /// A single commit
    Commit {
        /// Commit id
        sha: String,
    },
    /// A single file on the configured branch
    File {
        /// Path relative to the configured root directory
        path: String,

        /// Treat the path as a media asset
        #[arg(long)]
        media: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from([
            "studio",
            "commit",
            "-m",
            "update",
            "--modified",
            "a.md",
            "--modified",
            "b.md",
            "--deleted",
            "c.md",
        ])
        .unwrap();
        match cli.command {
            Command::Commit {
                message,
                created,
                modified,
                deleted,
            } => {
                assert_eq!(message, "update");
                assert!(created.is_empty());
                assert_eq!(modified, vec!["a.md", "b.md"]);
                assert_eq!(deleted, vec!["c.md"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_url_file_media() {
        let cli =
            Cli::try_parse_from(["studio", "--dev", "url", "file", "logo.png", "--media"]).unwrap();
        assert!(cli.dev);
        match cli.command {
            Command::Url { target, open } => {
                assert!(!open);
                assert_eq!(
                    target,
                    UrlTarget::File {
                        path: "logo.png".into(),
                        media: true
                    }
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn commit_requires_message() {
        assert!(Cli::try_parse_from(["studio", "commit", "--modified", "a.md"]).is_err());
    }
}
