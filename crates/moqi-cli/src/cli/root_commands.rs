use clap::{Args, Subcommand};

use crate::cli::subcommands::{StartupCommands, SwiperCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Startup profiles.
    Startup {
        #[command(subcommand)]
        action: StartupCommands,
    },
    /// Swiper profiles.
    Swiper {
        #[command(subcommand)]
        action: SwiperCommands,
    },
    /// Run one swiping round non-interactively and print the results.
    Swipe(SwipeArgs),
    /// Startups a swiper has not decided on yet.
    Candidates(CandidatesArgs),
    /// Interaction rows for one swiper or one startup.
    Interactions(InteractionsArgs),
    /// Coin and feedback totals for one startup.
    Insights(InsightsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SwipeArgs {
    /// Swiper ID.
    #[arg(long)]
    pub swiper: String,
    /// One decision per candidate, in order (like/dislike, l/d, yes/no).
    #[arg(long, value_delimiter = ',', required = true)]
    pub decisions: Vec<String>,
    /// Feedback preferences as STARTUP=no|group|all.
    #[arg(long, value_delimiter = ',')]
    pub feedback: Vec<String>,
    /// Coin allocations as STARTUP=COINS, multiples of 10 summing to 100.
    #[arg(long, value_delimiter = ',')]
    pub allocate: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct CandidatesArgs {
    /// Swiper ID.
    #[arg(long)]
    pub swiper: String,
}

#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InteractionsArgs {
    /// Rows written by this swiper.
    #[arg(long)]
    pub swiper: Option<String>,
    /// Rows received by this startup.
    #[arg(long)]
    pub startup: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct InsightsArgs {
    /// Startup ID.
    #[arg(long)]
    pub startup: String,
    /// Only count interactions created at or after this RFC 3339 timestamp.
    #[arg(long)]
    pub from: Option<String>,
    /// Only count interactions created at or before this RFC 3339 timestamp.
    #[arg(long)]
    pub to: Option<String>,
}
