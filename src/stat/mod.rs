pub mod client;
pub mod parse;
pub mod query;

pub use client::*;
pub use parse::*;
pub use query::*;
