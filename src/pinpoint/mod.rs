pub mod client;
pub mod types;

pub use client::PinpointClient;
pub use types::RESUME_CONTEXT;
