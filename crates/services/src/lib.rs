#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod routes;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use config::AppConfig;
pub use error::{AppServicesError, CatalogLoadError, ConfigError, HistoryServiceError, SessionError};
pub use feedback::{Cue, FeedbackError, FeedbackSink, RecordingFeedback, SilentFeedback};
pub use history::{HistoryListItem, HistoryService};
pub use routes::Route;

pub use sessions::{QuizLoopService, SessionProgress, SessionStep};
