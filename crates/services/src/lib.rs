#![forbid(unsafe_code)]

pub mod app_services;
pub mod checklist_service;
pub mod error;
pub mod local_lms;
pub mod scorm;

pub use selector_core::Clock;

pub use app_services::{AppServices, LaunchOptions};
pub use checklist_service::ChecklistService;
pub use error::{AppServicesError, LocalLmsError, ScormError};
pub use local_lms::{CommitWriter, LmsState, LocalLms};
pub use scorm::{
    DEFAULT_FIND_ATTEMPT_LIMIT, Discovery, FrameHost, FrameId, FrameTree, NoOpApi, ScormConfig,
    ScormSession, SessionState, discover,
};
