pub mod config;
pub mod constants;
pub mod database_pool;
pub mod error;
pub mod layer;
mod service;
pub mod session;
pub mod session_data;
pub mod session_store;

pub use config::AxumSessionConfig;
pub use database_pool::AxumDatabasePool;
pub use error::SessionError;
pub use layer::AxumSessionLayer;
pub use service::AxumSessionService;
pub use session::AxumSession;
pub use session_data::SessionData;
pub use session_store::AxumSessionStore;
