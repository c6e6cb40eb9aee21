pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod script;

// Re-export main types
pub use bridge::{Bridge, Runtime, ScriptSource, INVOKE_COMMAND};
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use host::{CommandHost, HostEngine, Status};
pub use script::{HostCalls, ScriptEngine, ScriptError};
