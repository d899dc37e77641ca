use clap::Subcommand;

/// Startup profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StartupCommands {
    /// Register a startup.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        tagline: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        /// Founding year.
        #[arg(long)]
        founded: Option<i32>,
        /// Employee band, e.g. "11-50".
        #[arg(long)]
        employees: Option<String>,
        #[arg(long)]
        logo_url: Option<String>,
    },
    /// List startups.
    List,
}

/// Swiper profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SwiperCommands {
    /// Register a swiper.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: Option<u32>,
        /// Field of study.
        #[arg(long)]
        field: Option<String>,
    },
}
