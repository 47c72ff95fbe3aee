//! Per-client CPU utilization push streams.
//!
//! A [`StreamSession`] owns one client: it takes a baseline sample on start,
//! then on every tick samples again, pushes one `data:` frame with the
//! utilization since the previous sample, and rolls the baseline forward.
//! It ends when the client goes away or a write fails.

pub mod connection;
pub mod event;
pub mod session;

pub use connection::{ChannelConnection, StreamConnection};
pub use event::UtilizationReading;
pub use session::{SessionEnd, SessionError, StreamSession};
