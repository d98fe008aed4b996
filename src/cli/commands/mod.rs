pub mod areas;
pub mod objectives;
pub mod settings;

pub use areas::{AreasCommands, AreasSubcommands};
pub use objectives::{CreateArgs, ListArgs, SubmitArgs};
pub use settings::{SettingsCommands, SettingsSubcommands};
