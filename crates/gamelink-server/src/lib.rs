pub mod driver;
pub mod server;
pub mod socket;

pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
