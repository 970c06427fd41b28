pub mod dedup;
pub mod http;
pub mod orchestrator;
pub mod provider;

pub use http::HttpGenerator;
pub use orchestrator::Generator;
pub use provider::GenerationProvider;
