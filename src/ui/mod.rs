//! User interface and interaction
//!
//! CLI parsing, interactive prompts, progress reporting, the output sink
//! and shell completion generation.

pub mod cli;
pub mod color;
pub mod completion;
pub mod output;
pub mod progress;
pub mod prompt;

// Re-export commonly used items
pub use cli::{Cli, Commands, cli_to_config};
pub use completion::print_completions;
pub use output::{unique_output_path, write_items, write_results};
pub use progress::ProgressReporter;
pub use prompt::Prompter;
