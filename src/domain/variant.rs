use serde::{Deserialize, Serialize};
use std::fmt;

/// Which configuration of the Reddit TIFU corpus to read.
///
///   - Short: every post, summarised by its title
///   - Long:  only posts carrying a TL;DR, summarised by it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TifuVariant {
    Short,
    Long,
}

impl TifuVariant {
    /// Both variants in the order they are concatenated
    pub const ALL: [TifuVariant; 2] = [TifuVariant::Short, TifuVariant::Long];

    pub fn name(self) -> &'static str {
        match self {
            TifuVariant::Short => "short",
            TifuVariant::Long  => "long",
        }
    }
}

impl fmt::Display for TifuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
