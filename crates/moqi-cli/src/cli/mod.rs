use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `moqi` binary.
#[derive(Debug, Parser)]
#[command(name = "moqi", version, about = "MoQi - swipe, fund, and rank startups")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides db.path from config)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::StartupCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "moqi",
            "--format",
            "table",
            "--limit",
            "5",
            "--verbose",
            "startup",
            "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(5));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Startup {
                action: StartupCommands::List
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["moqi", "candidates", "--swiper", "swp-1", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Candidates(ref args) if args.swiper == "swp-1"));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["moqi", "--format", "xml", "startup", "list"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn swipe_lists_split_on_commas() {
        let cli = Cli::try_parse_from([
            "moqi",
            "swipe",
            "--swiper",
            "swp-1",
            "--decisions",
            "like,dislike,like",
            "--feedback",
            "stu-a=group,stu-b=no",
            "--allocate",
            "stu-a=30",
            "--allocate",
            "stu-c=70",
        ])
        .expect("cli should parse");

        let Commands::Swipe(args) = cli.command else {
            panic!("expected swipe command");
        };
        assert_eq!(args.decisions, vec!["like", "dislike", "like"]);
        assert_eq!(args.feedback, vec!["stu-a=group", "stu-b=no"]);
        assert_eq!(args.allocate, vec!["stu-a=30", "stu-c=70"]);
    }

    #[test]
    fn interactions_require_exactly_one_side() {
        assert!(Cli::try_parse_from(["moqi", "interactions"]).is_err());
        assert!(
            Cli::try_parse_from(["moqi", "interactions", "--swiper", "a", "--startup", "b"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["moqi", "interactions", "--startup", "b"]).is_ok());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["moqi", "--db", "/tmp/moqi.db", "startup", "list"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/moqi.db"));
    }
}
