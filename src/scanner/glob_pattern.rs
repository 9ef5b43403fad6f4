use crate::error::{Result, ScanError};
use regex::Regex;
use std::path::{Path, PathBuf};

/// A path glob split into a literal walk root and a matcher for the rest.
///
/// `*` and `?` never cross a `/`. `**` must be a whole component and matches
/// zero or more directories, or everything below when it is the last one.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    root: PathBuf,
    matcher: Option<Regex>,
    max_depth: Option<usize>,
    /// Components below the root that start with `.`, by index, with a matcher each.
    dotted: Vec<(usize, Regex)>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let raw = pattern.trim().to_string();
        if raw.is_empty() {
            return Err(ScanError::EmptyPattern);
        }

        let normalized = raw.replace('\\', "/");
        let components: Vec<&str> = normalized.split('/').collect();

        let first_wild = components.iter().position(|c| has_wildcard(c));

        let Some(first_wild) = first_wild else {
            return Ok(Self {
                root: PathBuf::from(&raw),
                raw,
                matcher: None,
                max_depth: Some(0),
                dotted: Vec::new(),
            });
        };

        let root = literal_root(&components[..first_wild]);
        let rest: Vec<&str> = components[first_wild..]
            .iter()
            .copied()
            .filter(|c| !c.is_empty())
            .collect();

        for component in &rest {
            if component.contains("**") && *component != "**" {
                return Err(ScanError::InvalidPattern {
                    pattern: raw.clone(),
                    message: format!("`**` must be a whole path component, found `{}`", component),
                });
            }
        }

        let regex_source = translate(&rest, &raw)?;
        let matcher = Regex::new(&regex_source).map_err(|e| ScanError::InvalidPattern {
            pattern: raw.clone(),
            message: e.to_string(),
        })?;

        let max_depth = if rest.contains(&"**") {
            None
        } else {
            Some(rest.len())
        };

        let mut dotted = Vec::new();
        for (index, component) in rest.iter().enumerate() {
            if !component.starts_with('.') {
                continue;
            }
            let mut source = String::from("^");
            translate_component(component, &raw, &mut source)?;
            source.push('$');
            let component_matcher = Regex::new(&source).map_err(|e| ScanError::InvalidPattern {
                pattern: raw.clone(),
                message: e.to_string(),
            })?;
            dotted.push((index, component_matcher));
        }

        Ok(Self {
            raw,
            root,
            matcher: Some(matcher),
            max_depth,
            dotted,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Directory the walk starts from, or the single file for a literal pattern.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_literal(&self) -> bool {
        self.matcher.is_none()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Whether a hidden entry `depth` levels below the root is named by a
    /// component that itself starts with `.`. Below a `**` the depth of a
    /// component is not fixed, so any such component may name the entry.
    pub fn names_hidden(&self, depth: usize, name: &str) -> bool {
        self.dotted.iter().any(|(index, matcher)| {
            (self.max_depth.is_none() || *index + 1 == depth) && matcher.is_match(name)
        })
    }

    /// Matches a path relative to [`root`](Self::root), using `/` separators.
    pub fn matches_relative(&self, relative: &str) -> bool {
        match self.matcher {
            Some(ref matcher) => matcher.is_match(relative),
            None => relative.is_empty(),
        }
    }
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

fn literal_root(components: &[&str]) -> PathBuf {
    if components.is_empty() {
        return PathBuf::new();
    }

    let joined = components.join("/");
    if joined.is_empty() {
        // Pattern starts right at the filesystem root, e.g. "/**/*.pdf".
        PathBuf::from("/")
    } else {
        PathBuf::from(joined)
    }
}

fn translate(components: &[&str], raw: &str) -> Result<String> {
    let mut regex = String::from("^");

    for (index, component) in components.iter().enumerate() {
        let is_last = index + 1 == components.len();

        if *component == "**" {
            if is_last {
                regex.push_str(".*");
            } else {
                regex.push_str("(?:[^/]+/)*");
            }
            continue;
        }

        translate_component(component, raw, &mut regex)?;
        if !is_last {
            regex.push('/');
        }
    }

    regex.push('$');
    Ok(regex)
}

fn translate_component(component: &str, raw: &str, out: &mut String) -> Result<()> {
    let chars: Vec<char> = component.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let Some(close) = find_class_end(&chars, i) else {
                    return Err(ScanError::InvalidPattern {
                        pattern: raw.to_string(),
                        message: "unclosed character class".to_string(),
                    });
                };

                out.push('[');
                let mut j = i + 1;
                if chars[j] == '!' {
                    out.push('^');
                    j += 1;
                }
                while j < close {
                    let c = chars[j];
                    // Characters with meaning inside a regex class, taken literally.
                    if matches!(c, '\\' | '[' | ']' | '&' | '~' | '^') {
                        out.push('\\');
                    }
                    out.push(c);
                    j += 1;
                }
                out.push(']');
                i = close;
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    Ok(())
}

/// Index of the `]` closing the class opened at `open`. A `]` right after the
/// opening bracket (or after `!`) is part of the class.
fn find_class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}
