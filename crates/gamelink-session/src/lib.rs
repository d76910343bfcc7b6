pub mod frame;
pub mod session;

pub use frame::Frame;
pub use session::{Session, SessionConfig};
