pub mod provider;

pub use provider::{parse_app_details, SteamProvider};
