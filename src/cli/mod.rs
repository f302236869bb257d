pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, FetchArgs, OutputFormatArg, TransformArgs};
pub use handlers::{handle_config, handle_fetch, handle_transform};
pub use output::{OutputFormat, OutputFormatter};
