pub mod envelope;
pub mod errors;
pub mod ids;
pub mod messages;

pub use envelope::{Envelope, OutboundMessage};
pub use errors::{SessionError, TransportError};
pub use ids::SessionId;
pub use messages::{
    AddGameChar, GameToken, GetGameBalance, MessageSet, SendGameBalance, SetServerStatus,
};
