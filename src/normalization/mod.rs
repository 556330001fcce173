pub mod json_path;
pub mod numbers;

pub use json_path::JsonPathExt;
