use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Functional area (fuzzy matched against known areas)
    #[arg(short, long)]
    pub area: Option<String>,
    /// Functional grouping within the area
    #[arg(short, long)]
    pub grouping: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Functional area (fuzzy matched against known areas)
    #[arg(short, long)]
    pub area: String,
    /// Functional grouping within the area
    #[arg(short, long)]
    pub grouping: String,
    /// Objective description; repeat once per objective
    #[arg(long = "objective", value_name = "TEXT", required = true)]
    pub objectives: Vec<String>,
    /// Indicator for the objective at the same position
    #[arg(long = "indicator", value_name = "TEXT")]
    pub indicators: Vec<String>,
    /// Responsible person for the objective at the same position
    #[arg(long = "responsible", value_name = "NAME")]
    pub responsibles: Vec<String>,
    /// Also write the submitted objectives to an Excel file
    #[arg(long)]
    pub download: bool,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only objectives of this area
    #[arg(long)]
    pub area: Option<String>,
    /// Only objectives in this status (e.g. ACTIVO)
    #[arg(long)]
    pub status: Option<String>,
    /// Only objectives of this responsible person
    #[arg(long)]
    pub responsible: Option<String>,
    /// Write the filtered objectives to an Excel file
    #[arg(short, long)]
    pub export: bool,
    /// Directory for the exported file (defaults to the configured export dir)
    #[arg(long, value_name = "DIR", requires = "export")]
    pub output: Option<PathBuf>,
}
