//! Utility helpers shared by the Cover Letter Studio CLI and TUI.
//!
//! - [`settings`]: read-only configuration resolution
//! - [`delivery`]: saving generated PDFs the way a browser download would
//! - [`directory`]: directory listings for the resume picker

pub mod delivery;
pub mod directory;
pub mod path_processing;
pub mod settings;

pub use delivery::*;
pub use directory::*;
pub use path_processing::*;
pub use settings::*;
