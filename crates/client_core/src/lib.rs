//! Client side of the word-cloud workbench: view state, user actions and the
//! HTTP client for the word-cloud service.

pub mod controller;
pub mod error;
pub mod notify;
pub mod service;
pub mod view;

pub use controller::{notification_for, ClickTarget, Controller, Operation, UiAction};
pub use error::ClientError;
pub use notify::{Notification, NotificationLevel, Notifier};
pub use service::{GeneratedCloud, HttpWordCloudService, WordCloudService};
pub use view::ViewState;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod service_tests;
