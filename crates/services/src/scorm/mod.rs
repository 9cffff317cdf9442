//! Client side of the SCORM run-time: finding the host API and driving a
//! session against it.

mod config;
mod discovery;
mod frames;
mod noop;
mod session;

pub use config::ScormConfig;
pub use discovery::{DEFAULT_FIND_ATTEMPT_LIMIT, Discovery, discover};
pub use frames::{FrameHost, FrameId, FrameTree};
pub use noop::NoOpApi;
pub use session::{ScormSession, SessionState};
