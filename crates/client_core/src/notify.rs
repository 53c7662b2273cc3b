use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn title(self) -> &'static str {
        match self {
            NotificationLevel::Info => "Info",
            NotificationLevel::Warning => "Warning",
            NotificationLevel::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.level.title()
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.message)
    }
}

/// Presents a notification to the user. Delivery is synchronous.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T> Notifier for Arc<T>
where
    T: Notifier + ?Sized,
{
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}
