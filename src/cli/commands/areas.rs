use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AreasCommands {
    #[command(subcommand)]
    pub command: AreasSubcommands,
}

#[derive(Subcommand)]
pub enum AreasSubcommands {
    /// List areas and their functional groupings
    List,
    /// Register a new functional grouping under an area
    Add {
        /// Area name
        #[arg(short, long)]
        area: String,
        /// New functional grouping name
        #[arg(short, long)]
        grouping: String,
    },
}
