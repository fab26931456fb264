//! Command line definitions for the `mindhub` binary.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use mindhub_client::endpoints;

#[derive(Parser)]
#[command(
    name = "mindhub",
    version,
    about = "Browse and moderate a Mindustry community hub",
    long_about = "Browse paginated hub content, list game servers and review\n\
                  pending schematic and post submissions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Client configuration file (RON).
    #[arg(long, value_name = "PATH", default_value = "mindhub.ron", global = true)]
    pub config: PathBuf,

    /// Backend base URL, overriding the configuration file.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Also write logs to this file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load pages of a paginated resource and print one JSON item per line.
    List(ListArgs),

    /// List game servers, named ones first.
    Servers(ServersArgs),

    /// Show submissions waiting for review.
    Queue(QueueArgs),

    /// Verify or reject one submission.
    Verify(VerifyArgs),

    /// Print the tag categories for one submission kind.
    Tags {
        #[arg(value_enum)]
        kind: SubmissionKind,
    },

    /// Show the signed-in user.
    Me,

    /// Check that the backend answers.
    Ping,
}

#[derive(Args)]
pub struct ListArgs {
    /// Resource path, e.g. `schematic` or `map`.
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Items per page (defaults to the configured page size).
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Extra query parameter; repeatable.
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,

    /// Only items carrying this tag; repeatable.
    #[arg(long = "tag", value_name = "NAME:VALUE")]
    pub tags: Vec<String>,

    /// Write the loaded items to this JSON file.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServersArgs {
    /// Register a server before listing.
    #[arg(long, value_name = "ADDRESS", conflicts_with = "remove")]
    pub add: Option<String>,

    /// Remove a server after listing it.
    #[arg(long, value_name = "ADDRESS")]
    pub remove: Option<String>,

    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 5)]
    pub pages: usize,
}

#[derive(Args)]
pub struct QueueArgs {
    #[arg(value_enum)]
    pub kind: SubmissionKind,

    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 1)]
    pub pages: usize,
}

#[derive(Args)]
#[command(group(ArgGroup::new("decision").required(true).args(["approve", "reject"])))]
pub struct VerifyArgs {
    #[arg(value_enum)]
    pub kind: SubmissionKind,

    /// Submission id.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Tag to attach on approval; repeatable, comma-joined lists allowed.
    #[arg(long = "tag", value_name = "NAME:VALUE")]
    pub tags: Vec<String>,

    /// Accept the submission.
    #[arg(long)]
    pub approve: bool,

    /// Reject the submission, with an optional reason.
    #[arg(long, value_name = "REASON", num_args = 0..=1)]
    pub reject: Option<Option<String>>,

    /// Pages of the queue to search for the submission.
    #[arg(long, default_value_t = 10)]
    pub pages: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SubmissionKind {
    #[value(alias = "schematics")]
    Schematic,
    #[value(alias = "posts")]
    Post,
}

impl SubmissionKind {
    /// Upload queue resource.
    pub fn resource(self) -> &'static str {
        match self {
            SubmissionKind::Schematic => endpoints::SCHEMATIC_UPLOADS,
            SubmissionKind::Post => endpoints::POST_UPLOADS,
        }
    }

    pub fn tag_kind(self) -> &'static str {
        match self {
            SubmissionKind::Schematic => endpoints::SCHEMATIC_UPLOAD_TAGS,
            SubmissionKind::Post => endpoints::POST_UPLOAD_TAGS,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reject_reason_is_optional() {
        let cli = Cli::try_parse_from(["mindhub", "verify", "posts", "p1", "--reject"])
            .expect("parse");
        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.kind, SubmissionKind::Post);
        assert_eq!(args.reject, Some(None));
        assert!(!args.approve);
    }

    #[test]
    fn verify_needs_a_decision() {
        assert!(Cli::try_parse_from(["mindhub", "verify", "schematic", "s1"]).is_err());
        assert!(Cli::try_parse_from([
            "mindhub", "verify", "schematic", "s1", "--approve", "--reject"
        ])
        .is_err());
    }

    #[test]
    fn query_pairs_are_split_on_first_equals() {
        let cli = Cli::try_parse_from([
            "mindhub", "list", "schematic", "--query", "name=a=b", "--tag", "mode:pvp",
        ])
        .expect("parse");
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.query, vec![("name".to_string(), "a=b".to_string())]);
        assert_eq!(args.tags, vec!["mode:pvp".to_string()]);
        assert!(parse_key_value("=x").is_err());
    }
}
