pub mod chat;
pub mod parse;
pub mod request;
pub mod runtime;
