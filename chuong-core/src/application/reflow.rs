//! Line reflow decisions
//!
//! PDF line breaks follow the page layout, not the sentence. Two adjacent
//! lines are merged when every rule in an ordered cascade allows it. Each
//! rule is a named predicate so locales can add or swap rules without
//! touching the control flow.

use crate::application::config::PunctuationConfig;
use crate::domain::heading;
use crate::tables::CharTable;

/// Two adjacent lines under consideration, both trimmed
#[derive(Debug, Clone, Copy)]
pub struct LinePair<'a> {
    /// The line that would absorb the next one
    pub current: &'a str,
    /// The following line
    pub next: &'a str,
}

/// Punctuation the rules consult
#[derive(Debug, Clone)]
pub struct ReflowTables {
    /// Marks that close a sentence
    pub sentence_endings: CharTable,
    /// Characters that open a list item or dialogue line
    pub list_markers: CharTable,
}

impl Default for ReflowTables {
    fn default() -> Self {
        Self::from(&PunctuationConfig::default())
    }
}

impl From<&PunctuationConfig> for ReflowTables {
    fn from(config: &PunctuationConfig) -> Self {
        Self {
            sentence_endings: config.sentence_endings_table(),
            list_markers: config.list_markers_table(),
        }
    }
}

/// A single join condition; returns true when joining is allowed
#[derive(Clone, Copy)]
pub struct JoinRule {
    /// Stable name, reported when the rule blocks a join
    pub name: &'static str,
    /// The predicate
    pub allows: fn(&LinePair<'_>, &ReflowTables) -> bool,
}

impl std::fmt::Debug for JoinRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinRule").field("name", &self.name).finish()
    }
}

/// Neither line is blank
pub const BOTH_NON_EMPTY: JoinRule = JoinRule {
    name: "both_non_empty",
    allows: |pair, _| !pair.current.is_empty() && !pair.next.is_empty(),
};

/// Neither line is a chapter heading
pub const NO_HEADING: JoinRule = JoinRule {
    name: "no_heading",
    allows: |pair, _| !heading::is_heading(pair.current) && !heading::is_heading(pair.next),
};

/// The current line leaves its sentence open
pub const OPEN_SENTENCE: JoinRule = JoinRule {
    name: "open_sentence",
    allows: |pair, tables| !tables.sentence_endings.ends(pair.current),
};

/// The next line is not a bullet or dialogue dash
pub const NO_LIST_MARKER: JoinRule = JoinRule {
    name: "no_list_marker",
    allows: |pair, tables| !tables.list_markers.starts(pair.next),
};

/// The next line does not start with an uppercase letter. Digits pass.
pub const LOWERCASE_CONTINUATION: JoinRule = JoinRule {
    name: "lowercase_continuation",
    allows: |pair, _| !pair.next.chars().next().is_some_and(char::is_uppercase),
};

/// Rule cascade in evaluation order
pub const DEFAULT_RULES: [JoinRule; 5] = [
    BOTH_NON_EMPTY,
    NO_HEADING,
    OPEN_SENTENCE,
    NO_LIST_MARKER,
    LOWERCASE_CONTINUATION,
];

/// Decides whether adjacent lines belong to the same sentence
#[derive(Debug, Clone)]
pub struct LineReflow {
    rules: Vec<JoinRule>,
    tables: ReflowTables,
}

impl Default for LineReflow {
    fn default() -> Self {
        Self::new(ReflowTables::default())
    }
}

impl LineReflow {
    /// Create with the default rule cascade
    pub fn new(tables: ReflowTables) -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            tables,
        }
    }

    /// Create from punctuation configuration
    pub fn from_config(config: &PunctuationConfig) -> Self {
        Self::new(ReflowTables::from(config))
    }

    /// Append a rule to the cascade
    pub fn with_rule(mut self, rule: JoinRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[JoinRule] {
        &self.rules
    }

    /// First rule that forbids joining, if any
    pub fn blocking_rule(&self, current: &str, next: &str) -> Option<&'static str> {
        let pair = LinePair {
            current: current.trim(),
            next: next.trim(),
        };
        self.rules
            .iter()
            .find(|rule| !(rule.allows)(&pair, &self.tables))
            .map(|rule| rule.name)
    }

    /// Whether `next` continues the sentence on `current`
    pub fn should_join(&self, current: &str, next: &str) -> bool {
        self.blocking_rule(current, next).is_none()
    }
}
