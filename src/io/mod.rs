//! CSV input series and dispatch trace export.

pub mod export;
pub mod import;
