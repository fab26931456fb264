use std::collections::VecDeque;
use std::time::Duration;

use mindhub_logging::{hub_info, hub_warn};

use crate::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient message for the user (the popup of a GUI, a line in a CLI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub duration: Duration,
}

impl Notice {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Current user and pending notices for one front-end session.
///
/// Built once when the front end starts and handed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    user: Option<User>,
    loading: bool,
    notices: VecDeque<Notice>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// A stored token is being exchanged for the user profile.
    pub fn begin_login(&mut self) {
        self.loading = true;
    }

    pub fn login(&mut self, user: User) {
        hub_info!("logged in as {} ({})", user.name, user.id);
        self.user = Some(user);
        self.loading = false;
    }

    pub fn login_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        hub_warn!("login failed: {}", message);
        self.user = None;
        self.loading = false;
        self.notify(Notice::error(format!("login failed: {message}")));
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.loading = false;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}
