use crate::error::{Result, ScanError};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Per-keyword occurrence counts for one file, in keyword-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    counts: Vec<KeywordCount>,
}

impl FileReport {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    pub fn has_matches(&self) -> bool {
        self.counts.iter().any(|c| c.count > 0)
    }

    pub fn get(&self, keyword: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.keyword == keyword)
            .map(|c| c.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordCount> {
        self.counts.iter()
    }

    /// Keywords with a nonzero count.
    pub fn matched(&self) -> impl Iterator<Item = &KeywordCount> {
        self.counts.iter().filter(|c| c.count > 0)
    }
}

struct KeywordMatcher {
    keyword: String,
    regex: Regex,
}

/// Counts whole-word, case-sensitive keyword occurrences.
///
/// An occurrence counts only when the characters on both sides are non-word
/// characters (not alphanumeric, not `_`) or the edges of the text, so `cat`
/// is not found in `category` while `C++` is found in `I love C++ and C#`.
pub struct KeywordCounter {
    matchers: Vec<KeywordMatcher>,
}

impl KeywordCounter {
    pub fn new(keywords: &[String]) -> Result<Self> {
        if keywords.is_empty() {
            return Err(ScanError::EmptyKeywords);
        }

        let matchers = keywords
            .iter()
            .map(|keyword| {
                if keyword.is_empty() {
                    return Err(ScanError::Config {
                        message: "Keywords must not be empty".to_string(),
                    });
                }

                let regex = Regex::new(&regex::escape(keyword)).map_err(|e| ScanError::Config {
                    message: format!("Cannot build matcher for keyword '{}': {}", keyword, e),
                })?;

                Ok(KeywordMatcher {
                    keyword: keyword.clone(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn count(&self, text: &str) -> FileReport {
        let counts = self
            .matchers
            .iter()
            .map(|m| KeywordCount {
                keyword: m.keyword.clone(),
                count: count_whole_words(&m.regex, text),
            })
            .collect();

        FileReport { counts }
    }
}

fn count_whole_words(regex: &Regex, text: &str) -> usize {
    let mut count = 0;
    let mut pos = 0;

    while let Some(found) = regex.find_at(text, pos) {
        if is_boundary_before(text, found.start()) && is_boundary_after(text, found.end()) {
            count += 1;
            pos = found.end();
        } else {
            // Retry one character further so a rejected candidate cannot hide an overlapping one.
            let step = text[found.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            pos = found.start() + step;
        }

        if pos > text.len() {
            break;
        }
    }

    count
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_boundary_before(text: &str, index: usize) -> bool {
    text[..index].chars().next_back().map_or(true, |c| !is_word_char(c))
}

fn is_boundary_after(text: &str, index: usize) -> bool {
    text[index..].chars().next().map_or(true, |c| !is_word_char(c))
}
