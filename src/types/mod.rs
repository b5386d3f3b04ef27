mod format;
mod user;

pub use format::OutputFormat;
pub use user::{User, NULL_SENTINEL};
