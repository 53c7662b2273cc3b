use std::collections::BTreeSet;

/// Punctuation and function words that are never counted.
const BUILTIN_STOPWORDS: &[&str] = &[
    // CJK punctuation
    "，", "。", "！", "？", "、", "；", "：", "“", "”", "‘", "’", "（", "）", "【", "】",
    "《", "》", "〈", "〉", "…", "—", "～", "@", "#", "￥", "%",
    // ASCII punctuation
    "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/", ":", ";", "<",
    "=", ">", "?", "@", "[", "\\", "]", "^", "_", "`", "{", "|", "}", "~",
    // particles and function words
    "啊", "哎", "哎呀", "哎哟", "唉", "嗯", "呢", "吧", "啦", "呀", "哦", "噢", "的", "了",
    "着", "嘛", "吗", "都", "就", "而", "而且", "但是", "但", "却", "这", "那", "这个", "那个",
    "这些", "那些", "什么", "谁", "哪", "哪个", "哪些", "怎么", "怎么样", "怎样", "为什么", "是",
    "不是", "没", "没有", "不", "不要", "得", "地",
];

pub fn is_builtin_stopword(word: &str) -> bool {
    BUILTIN_STOPWORDS.contains(&word)
}

/// User-managed stopwords, kept in addition to the built-in list.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: BTreeSet<String>,
}

impl StopwordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Returns `false` when the word was already present.
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    /// Returns `false` when the word was not present.
    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(word)
    }

    /// True for custom and built-in stopwords alike.
    pub fn excludes(&self, word: &str) -> bool {
        is_builtin_stopword(word) || self.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
