pub mod script_client;

pub use script_client::ScriptClient;
