use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "grouper")]
#[command(about = "Sort a folder into AI-chosen groups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify the files under SOURCE and move them into groups under TARGET
    Organize(OrganizeArgs),
    /// List the files a run would consider, with creation dates
    Scan {
        /// Directory to inventory
        source: String,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct OrganizeArgs {
    /// Directory holding the files to organize
    #[arg(short, long)]
    pub source: String,
    /// Directory that receives one folder per group
    #[arg(short, long)]
    pub target: String,
    /// Free-text grouping rules handed to the classifier
    #[arg(short, long)]
    pub criteria: String,
    /// Skip files that go missing instead of asking for a new path
    #[arg(long)]
    pub non_interactive: bool,
    /// Fail the run when the classifier never answers, instead of doing nothing
    #[arg(long)]
    pub fail_on_unavailable: bool,
}
