//! Technology stacks recognised in `plan.md`.
//!
//! # Example
//!
//! ```rust
//! use speckit::setup::technology::{detect_technologies, Technology};
//!
//! let found = detect_technologies("Backend in Python 3.12 with a TypeScript frontend");
//! assert_eq!(found, vec![Technology::Python, Technology::JavaScript]);
//!
//! assert_eq!(Technology::Java.to_string(), "Java");
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// A stack that gets its own block in `.gitignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Technology {
    /// Python (pip, venv)
    Python,
    /// JavaScript / TypeScript on Node.js
    JavaScript,
    /// Java (Gradle, Maven)
    Java,
}

/// Static array of all technologies in detection order
static ALL_TECHNOLOGIES: &[Technology] =
    &[Technology::Python, Technology::JavaScript, Technology::Java];

impl Technology {
    /// Returns all technologies in detection order.
    pub fn all() -> &'static [Technology] {
        ALL_TECHNOLOGIES
    }

    /// Lower-case words in a plan that indicate this technology.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Technology::Python => &["python", "pip", "venv"],
            Technology::JavaScript => &["node", "npm", "yarn", "javascript", "typescript"],
            Technology::Java => &["java", "gradle", "maven"],
        }
    }

    /// Header line that opens this technology's ignore block.
    pub fn ignore_header(&self) -> &'static str {
        match self {
            Technology::Python => "# Python",
            Technology::JavaScript => "# Node.js",
            Technology::Java => "# Java",
        }
    }

    /// Ignore patterns appended for this technology.
    pub fn ignore_patterns(&self) -> &'static [&'static str] {
        match self {
            Technology::Python => &[
                "__pycache__/",
                "*.pyc",
                ".venv/",
                "venv/",
                "dist/",
                "*.egg-info/",
                ".env*",
                "*.log",
            ],
            Technology::JavaScript => &["node_modules/", "dist/", "build/", "*.log", ".env*"],
            Technology::Java => &["target/", "*.class", "*.jar", ".gradle/", "build/"],
        }
    }

    /// The full block, starting with a blank line and the header.
    pub fn ignore_block(&self) -> String {
        let mut block = format!("\n{}\n", self.ignore_header());
        for pattern in self.ignore_patterns() {
            block.push_str(pattern);
            block.push('\n');
        }
        block
    }

    fn keyword_regex(&self) -> &'static Regex {
        static PYTHON: OnceLock<Regex> = OnceLock::new();
        static JAVASCRIPT: OnceLock<Regex> = OnceLock::new();
        static JAVA: OnceLock<Regex> = OnceLock::new();

        let cell = match self {
            Technology::Python => &PYTHON,
            Technology::JavaScript => &JAVASCRIPT,
            Technology::Java => &JAVA,
        };
        cell.get_or_init(|| {
            // Version digits and a `js` suffix may follow: `python3`, `nodejs`.
            let pattern = format!(r"\b(?:{})(?:js)?\d*\b", self.keywords().join("|"));
            Regex::new(&pattern).expect("keyword pattern is valid")
        })
    }

    /// Whether lower-cased `plan` mentions one of this technology's keywords.
    pub fn is_mentioned_in(&self, plan: &str) -> bool {
        self.keyword_regex().is_match(plan)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Python => "Python",
            Technology::JavaScript => "JavaScript",
            Technology::Java => "Java",
        };
        write!(f, "{name}")
    }
}

/// Detect technologies mentioned in a plan, in [`Technology::all`] order.
///
/// Matching is case-insensitive and starts at a word boundary. A keyword may
/// carry a version number or a `js` suffix (`python3.12`, `pip3`, `nodejs`),
/// but any other continuation is a different word, so `javascript` does not
/// imply Java and `pipeline` does not imply Python.
#[must_use]
pub fn detect_technologies(plan: &str) -> Vec<Technology> {
    let plan = plan.to_lowercase();
    Technology::all()
        .iter()
        .copied()
        .filter(|tech| tech.is_mentioned_in(&plan))
        .collect()
}
