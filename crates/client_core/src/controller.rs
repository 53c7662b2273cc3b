//! Binds user actions to the word-cloud service and mirrors the results into
//! [`ViewState`].
//!
//! Every action takes `&mut self`, so one controller never has two requests
//! in flight. Failures are reported through the [`Notifier`] and returned to
//! the caller; none of them leave the controller unusable.

use std::path::{Path, PathBuf};

use shared::domain::{Theme, SAVED_IMAGE_FILENAME};
use tracing::{debug, info};

use crate::{
    error::ClientError,
    notify::{Notification, Notifier},
    service::WordCloudService,
    view::ViewState,
};

const CONNECTION_FAILED: &str = "Server connection failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Import,
    Generate,
    AddStopword,
    RemoveStopword,
    SaveImage,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Import => "Unable to read file content",
            Operation::Generate => "Failed to generate word cloud",
            Operation::AddStopword => "Failed to add stopword",
            Operation::RemoveStopword => "Failed to remove stopword",
            Operation::SaveImage => "Failed to save image",
        }
    }
}

/// Where a click on the open help dialog landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    EditText(String),
    Import(PathBuf),
    Generate,
    EditStopword(String),
    AddStopword,
    RemoveStopword(String),
    SaveImage(PathBuf),
    Reset,
    ToggleTheme,
    OpenHelp,
    CloseHelp,
    ClickHelp(ClickTarget),
}

pub struct Controller<S: WordCloudService, N: Notifier> {
    service: S,
    notifier: N,
    view: ViewState,
}

impl<S: WordCloudService, N: Notifier> Controller<S, N> {
    pub fn new(service: S, notifier: N) -> Self {
        Self {
            service,
            notifier,
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.view.text = text.into();
    }

    pub fn set_stopword_input(&mut self, word: impl Into<String>) {
        self.view.stopword_input = word.into();
    }

    /// Replaces the text with the contents of a plain-text file.
    pub async fn import_file(&mut self, path: &Path) -> Result<(), ClientError> {
        let result = read_text_file(path).await;
        match result {
            Ok(text) => {
                info!(path = %path.display(), chars = text.chars().count(), "imported text");
                self.view.text = text;
                Ok(())
            }
            Err(err) => Err(self.report(Operation::Import, err)),
        }
    }

    pub async fn generate(&mut self) -> Result<(), ClientError> {
        let text = self.view.text.trim();
        if text.is_empty() {
            return Err(self.report(
                Operation::Generate,
                ClientError::Validation("Please enter some text".into()),
            ));
        }

        match self.service.generate(text).await {
            Ok(cloud) => {
                info!(rows = cloud.frequencies.len(), "word cloud generated");
                self.view.frequencies = cloud.frequencies;
                self.view.image = Some(cloud.image);
                self.view.stopwords_visible = true;
                self.view.save_enabled = true;
                Ok(())
            }
            Err(err) => Err(self.report(Operation::Generate, err)),
        }
    }

    /// Adds the pending stopword input, then regenerates once.
    pub async fn add_stopword(&mut self) -> Result<(), ClientError> {
        let word = self.view.stopword_input.trim().to_string();
        if word.is_empty() {
            return Err(self.report(
                Operation::AddStopword,
                ClientError::Validation("Please enter a stopword to add".into()),
            ));
        }

        if let Err(err) = self.service.add_stopword(&word).await {
            return Err(self.report(Operation::AddStopword, err));
        }
        info!(word = %word, "stopword added");
        self.view.stopwords.push(word);
        self.view.stopword_input.clear();
        self.generate().await
    }

    /// Removes a stopword, then regenerates once.
    pub async fn remove_stopword(&mut self, word: &str) -> Result<(), ClientError> {
        if let Err(err) = self.service.remove_stopword(word).await {
            return Err(self.report(Operation::RemoveStopword, err));
        }
        if !self.view.remove_first_stopword(word) {
            debug!(word, "removed stopword was not listed locally");
        }
        info!(word, "stopword removed");
        self.generate().await
    }

    /// Downloads the current cloud into `dir` and returns the written path.
    pub async fn save_image(&mut self, dir: &Path) -> Result<PathBuf, ClientError> {
        if !self.view.save_enabled {
            return Err(self.report(
                Operation::SaveImage,
                ClientError::Validation("Generate a word cloud first".into()),
            ));
        }

        let bytes = match self.service.save_image().await {
            Ok(bytes) => bytes,
            Err(err) => return Err(self.report(Operation::SaveImage, err)),
        };
        let path = dir.join(SAVED_IMAGE_FILENAME);
        if let Err(source) = tokio::fs::write(&path, &bytes).await {
            return Err(self.report(
                Operation::SaveImage,
                ClientError::Write {
                    path: path.clone(),
                    source,
                },
            ));
        }
        info!(path = %path.display(), bytes = bytes.len(), "saved word cloud");
        let saved = Notification::info(format!("Word cloud saved to {}", path.display()));
        self.notifier.notify(saved);
        Ok(path)
    }

    pub fn reset(&mut self) {
        self.view.clear_session();
        debug!("view reset");
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.view.theme = self.view.theme.toggled();
        self.view.theme
    }

    pub fn open_help(&mut self) {
        self.view.help_visible = true;
    }

    pub fn close_help(&mut self) {
        self.view.help_visible = false;
    }

    /// Clicks on the backdrop close the dialog; clicks on its content do not.
    pub fn click_help(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close_help();
        }
    }

    /// Runs one action. Failures have already been notified when this returns.
    pub async fn dispatch(&mut self, action: UiAction) -> Result<(), ClientError> {
        match action {
            UiAction::EditText(text) => self.set_text(text),
            UiAction::Import(path) => self.import_file(&path).await?,
            UiAction::Generate => self.generate().await?,
            UiAction::EditStopword(word) => self.set_stopword_input(word),
            UiAction::AddStopword => self.add_stopword().await?,
            UiAction::RemoveStopword(word) => self.remove_stopword(&word).await?,
            UiAction::SaveImage(dir) => {
                self.save_image(&dir).await?;
            }
            UiAction::Reset => self.reset(),
            UiAction::ToggleTheme => {
                self.toggle_theme();
            }
            UiAction::OpenHelp => self.open_help(),
            UiAction::CloseHelp => self.close_help(),
            UiAction::ClickHelp(target) => self.click_help(target),
        }
        Ok(())
    }

    fn report(&self, operation: Operation, err: ClientError) -> ClientError {
        debug!(?operation, error = %err, "action failed");
        self.notifier.notify(notification_for(operation, &err));
        err
    }
}

/// Maps a failed action to what the user is shown.
pub fn notification_for(operation: Operation, err: &ClientError) -> Notification {
    match err {
        ClientError::Validation(message) => Notification::warning(message.clone()),
        ClientError::Service { message } => Notification::error(
            message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| operation.failure_message().to_string()),
        ),
        ClientError::Status { .. } if operation == Operation::SaveImage => {
            Notification::error(operation.failure_message())
        }
        ClientError::Status { .. } | ClientError::Transport(_) => {
            Notification::error(CONNECTION_FAILED)
        }
        ClientError::InvalidServerUrl { .. } => Notification::error(CONNECTION_FAILED),
        ClientError::Import { .. } => Notification::error(Operation::Import.failure_message()),
        ClientError::Write { source, .. } => {
            Notification::error(format!("{}: {source}", operation.failure_message()))
        }
    }
}

async fn read_text_file(path: &Path) -> Result<String, ClientError> {
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_text {
        return Err(ClientError::Validation(
            "Only plain-text (.txt) files can be imported".into(),
        ));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::Import {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| ClientError::Import {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
