//! File output, command line and error handling

/// Looping GIF encoding, atomic writes and inspection
pub mod animation;
/// Command-line parsing and subcommand execution
pub mod cli;
/// Named constants and defaults
pub mod configuration;
/// Error taxonomy
pub mod error;
/// Still PNG export of single patches
pub mod image;
/// Terminal progress bars for frame rendering
pub mod progress;
/// Website photo resizing, variants and enhancement
pub mod resize;
