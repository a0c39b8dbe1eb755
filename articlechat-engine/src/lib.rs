pub mod controller;
pub mod traits;
pub mod transcript;
