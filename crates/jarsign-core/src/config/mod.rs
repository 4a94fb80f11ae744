//! Settings loading and resolution

mod loader;
mod settings;

pub use loader::{ConfigLoader, CONFIG_FILE_NAMES};
pub use settings::{JarsignSettings, ResolvedSettings, SignerSettings};
