use serde::{Deserialize, Serialize};

pub const GENERATE_ROUTE: &str = "/generate";
pub const ADD_STOPWORD_ROUTE: &str = "/add_stopword";
pub const REMOVE_STOPWORD_ROUTE: &str = "/remove_stopword";
pub const SAVE_IMAGE_ROUTE: &str = "/save_image";
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// File name used when the rendered cloud is downloaded.
pub const SAVED_IMAGE_FILENAME: &str = "wordcloud.png";

/// A ranked `(word, count)` pair. Serialises as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordFrequency(pub String, pub u64);

impl WordFrequency {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self(word.into(), count)
    }

    pub fn word(&self) -> &str {
        &self.0
    }

    pub fn count(&self) -> u64 {
        self.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Value of the `data-theme` attribute for this theme.
    pub fn attribute(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon shown on the toggle button: it names the theme a click switches to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "dark_mode",
            Theme::Dark => "light_mode",
        }
    }
}
