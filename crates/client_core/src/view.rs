use shared::domain::{Theme, WordFrequency};

/// Everything the page shows. The controller is its only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub text: String,
    pub frequencies: Vec<WordFrequency>,
    /// Image reference from the last successful generation.
    pub image: Option<String>,
    pub stopword_input: String,
    pub stopwords: Vec<String>,
    pub stopwords_visible: bool,
    pub save_enabled: bool,
    pub theme: Theme,
    pub help_visible: bool,
}

impl ViewState {
    /// One display row per frequency pair, in service order.
    pub fn frequency_rows(&self) -> Vec<String> {
        self.frequencies
            .iter()
            .map(|f| format!("{}  {} times", f.word(), f.count()))
            .collect()
    }

    /// Clears session content. Theme and help visibility are left alone.
    pub(crate) fn clear_session(&mut self) {
        self.text.clear();
        self.frequencies.clear();
        self.image = None;
        self.stopword_input.clear();
        self.stopwords.clear();
        self.stopwords_visible = false;
        self.save_enabled = false;
    }

    pub(crate) fn remove_first_stopword(&mut self, word: &str) -> bool {
        match self.stopwords.iter().position(|w| w == word) {
            Some(index) => {
                self.stopwords.remove(index);
                true
            }
            None => false,
        }
    }
}
