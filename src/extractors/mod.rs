//! Request extractors shared by the resource handlers.

pub mod body;
pub mod filter;

pub use body::JsonObject;
pub use filter::ActiveFilter;
