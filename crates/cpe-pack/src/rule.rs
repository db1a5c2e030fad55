//! # Rules
//!
//! [`Rule`] is the authored form of a single matcher, tagged by `type` in
//! pack files. [`CompiledRule`] is its executable form, built once at load
//! time so that matching during a check cannot fail.
//!
//! Both are closed enums. Adding a matcher kind means adding a variant to
//! each and an arm to [`Rule::compile`]; no caller changes.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// An authored rule as it appears in a pack file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Regular expression matched case-insensitively anywhere in the content.
    Regex {
        /// Pattern in `regex` crate syntax.
        pattern: String,
        /// Violation message reported when the pattern matches.
        description: String,
    },
    /// Any of the listed keywords occurring as a whole word, case-insensitively.
    Keywords {
        /// Literal words or phrases. Must be non-empty.
        keywords: Vec<String>,
        /// Violation message reported when any keyword matches.
        description: String,
    },
}

impl Rule {
    /// Violation message for this rule.
    pub fn description(&self) -> &str {
        match self {
            Self::Regex { description, .. } | Self::Keywords { description, .. } => description,
        }
    }

    /// Short label of the rule kind, as written in pack files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Regex { .. } => "regex",
            Self::Keywords { .. } => "keywords",
        }
    }

    /// The pattern text this rule compiles to.
    ///
    /// Returns `None` for a keyword rule with no usable keywords.
    pub fn pattern_source(&self) -> Option<String> {
        match self {
            Self::Regex { pattern, .. } => Some(pattern.clone()),
            Self::Keywords { keywords, .. } => {
                let alternatives: Vec<String> = keywords
                    .iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty())
                    .map(bounded_keyword)
                    .collect();
                if alternatives.is_empty() {
                    None
                } else {
                    Some(format!("(?:{})", alternatives.join("|")))
                }
            }
        }
    }

    /// Compile into an executable rule.
    ///
    /// The caller supplies the pattern produced by [`Rule::pattern_source`];
    /// errors are wrapped with pack context by the caller.
    pub(crate) fn compile(&self, pattern: &str) -> Result<CompiledRule, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let description = self.description().to_string();
        Ok(match self {
            Self::Regex { .. } => CompiledRule::Regex { regex, description },
            Self::Keywords { .. } => CompiledRule::Keywords { regex, description },
        })
    }
}

/// Escape `keyword` and add a word boundary on each side that starts or
/// ends with a word character. `\b` next to punctuation such as `#` or `%`
/// would never match in running text.
fn bounded_keyword(keyword: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = keyword.chars().next().is_some_and(is_word);
    let trail = keyword.chars().last().is_some_and(is_word);
    format!(
        "{}{}{}",
        if lead { r"\b" } else { "" },
        regex::escape(keyword),
        if trail { r"\b" } else { "" },
    )
}

/// A rule ready for matching.
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// Compiled form of [`Rule::Regex`].
    Regex {
        /// Case-insensitive compiled pattern.
        regex: Regex,
        /// Violation message.
        description: String,
    },
    /// Compiled form of [`Rule::Keywords`].
    Keywords {
        /// Case-insensitive alternation of the keywords, word-bounded on
        /// their word-character edges.
        regex: Regex,
        /// Violation message.
        description: String,
    },
}

impl CompiledRule {
    /// Whether `content` violates this rule.
    pub fn matches(&self, content: &str) -> bool {
        match self {
            Self::Regex { regex, .. } | Self::Keywords { regex, .. } => regex.is_match(content),
        }
    }

    /// Violation message for this rule.
    pub fn description(&self) -> &str {
        match self {
            Self::Regex { description, .. } | Self::Keywords { description, .. } => description,
        }
    }
}
