//! Session handlers - state queries and resets.

mod get_session_state;
mod reset_session;

pub use get_session_state::{GetSessionStateHandler, SessionQueryError, SessionStateView};
pub use reset_session::ResetSessionHandler;
