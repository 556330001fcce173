pub mod parse;
pub mod provider;

pub use parse::parse_chart_page;
pub use provider::SteamChartsProvider;
