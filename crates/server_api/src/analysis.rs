use std::collections::HashMap;

use jieba_rs::Jieba;
use shared::domain::WordFrequency;

use crate::stopwords::StopwordSet;

/// Splits text into words and counts the ones worth showing.
pub struct Analyzer {
    jieba: Jieba,
}

impl Analyzer {
    /// Loads the bundled segmentation dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, false)
    }

    /// Ranked frequencies of every countable token in `text`.
    pub fn frequencies(&self, text: &str, stopwords: &StopwordSet) -> Vec<WordFrequency> {
        count_frequencies(self.segment(text), stopwords)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_countable(token: &str, stopwords: &StopwordSet) -> bool {
    if stopwords.excludes(token) {
        return false;
    }
    let trimmed = token.trim();
    if trimmed.chars().count() <= 1 {
        return false;
    }
    !trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Counts tokens and ranks them by count, descending. Ties keep first-seen order.
pub fn count_frequencies<'a, I>(tokens: I, stopwords: &StopwordSet) -> Vec<WordFrequency>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counted: Vec<WordFrequency> = Vec::new();

    for token in tokens {
        if !is_countable(token, stopwords) {
            continue;
        }
        match index.get(token) {
            Some(&slot) => counted[slot].1 += 1,
            None => {
                index.insert(token, counted.len());
                counted.push(WordFrequency::new(token, 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counted.sort_by(|a, b| b.count().cmp(&a.count()));
    counted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_short_numeric_and_stopword_tokens() {
        let mut stopwords = StopwordSet::new();
        stopwords.insert("mat");
        let tokens = ["the", " ", "cat", "a", "2024", "mat", "这个", "cat", "  "];
        let freqs = count_frequencies(tokens, &stopwords);
        assert_eq!(
            freqs,
            vec![WordFrequency::new("cat", 2), WordFrequency::new("the", 1)]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let tokens = ["zeta", "alpha", "mid", "alpha", "zeta", "mid", "omega"];
        let freqs = count_frequencies(tokens, &StopwordSet::new());
        let words: Vec<&str> = freqs.iter().map(WordFrequency::word).collect();
        assert_eq!(words, vec!["zeta", "alpha", "mid", "omega"]);
    }

    #[test]
    fn segments_mixed_text() {
        let analyzer = Analyzer::new();
        let freqs = analyzer.frequencies("the cat sat on the mat", &StopwordSet::new());
        assert_eq!(freqs[0], WordFrequency::new("the", 2));
        assert!(freqs.iter().any(|f| f.word() == "cat"));
        assert!(freqs.iter().all(|f| !f.word().trim().is_empty()));
    }

    #[test]
    fn segments_chinese_into_multi_character_words() {
        let analyzer = Analyzer::new();
        let freqs = analyzer.frequencies("我们今天学习词云。我们明天也学习！", &StopwordSet::new());
        let words: Vec<&str> = freqs.iter().map(WordFrequency::word).collect();
        assert!(words.contains(&"我们"), "unexpected words: {words:?}");
        assert!(words.contains(&"学习"), "unexpected words: {words:?}");
        assert!(words.iter().all(|w| w.chars().count() > 1));
    }
}
