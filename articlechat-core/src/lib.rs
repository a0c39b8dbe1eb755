pub mod config;
pub mod params;
pub mod text;
pub mod transcript;

// Keep the public surface small and intentional.
pub use config::*;
pub use params::*;
pub use text::*;
pub use transcript::*;
