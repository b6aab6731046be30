use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown trivia category: {0}")]
pub struct UnknownCategory(pub String);

/// Topic a question set is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    All,
    OldTestament,
    NewTestament,
    Jesus,
    Prophets,
    Miracles,
    Parables,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::OldTestament,
        Category::NewTestament,
        Category::Jesus,
        Category::Prophets,
        Category::Miracles,
        Category::Parables,
    ];

    /// Identifier sent to the question generator.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::OldTestament => "old-testament",
            Category::NewTestament => "new-testament",
            Category::Jesus => "jesus",
            Category::Prophets => "prophets",
            Category::Miracles => "miracles",
            Category::Parables => "parables",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Category::All => "All Topics",
            Category::OldTestament => "Old Testament",
            Category::NewTestament => "New Testament",
            Category::Jesus => "Life of Jesus",
            Category::Prophets => "Prophets",
            Category::Miracles => "Miracles",
            Category::Parables => "Parables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(needle.to_owned()))
    }
}
