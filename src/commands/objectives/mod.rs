pub mod browse;
pub mod create;
pub mod list;
pub mod submit;

pub use browse::browse_command;
pub use create::create_command;
pub use list::list_command;
pub use submit::submit_command;
