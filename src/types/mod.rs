mod events;
mod market;
mod protocol;
mod signal;

// Re-export all types
pub use events::*;
pub use market::*;
pub use protocol::*;
pub use signal::*;
