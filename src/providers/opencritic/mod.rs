pub mod credentials;
pub mod provider;

pub use credentials::load_api_key;
pub use provider::OpenCriticProvider;
