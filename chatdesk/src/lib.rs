pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
mod poller;
pub mod state;
pub mod store;
pub mod thread;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use state::{DashboardState, Notice, NoticeLevel};
pub use store::{ConversationStore, ConversationThread, HttpStore};
pub use thread::MessageThread;
