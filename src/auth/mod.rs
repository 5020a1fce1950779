pub mod accounts;
pub mod cookie;
pub mod extractor;
pub mod resets;
pub mod sessions;
pub mod tokens;
