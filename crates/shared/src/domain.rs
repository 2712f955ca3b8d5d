use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! tag_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

tag_newtype!(CultureTag);

/// Cultures the storytelling service ships with, paired with their display labels.
pub const BUILTIN_CULTURES: &[(&str, &str)] = &[
    ("indian", "🇮🇳 Indian"),
    ("japanese", "🇯🇵 Japanese"),
    ("african", "🌍 African"),
    ("celtic", "☘️ Celtic"),
    ("chinese", "🇨🇳 Chinese"),
    ("greek", "🏛️ Greek"),
    ("arabian", "🏜️ Arabian"),
    ("native_american", "🦅 Native American"),
];

pub const DEFAULT_CULTURE: &str = "indian";

impl CultureTag {
    pub fn builtin() -> Vec<CultureTag> {
        BUILTIN_CULTURES
            .iter()
            .map(|(tag, _)| CultureTag::from(*tag))
            .collect()
    }

    /// Display label for the tag, falling back to the raw tag when it is unknown.
    pub fn label(&self) -> &str {
        BUILTIN_CULTURES
            .iter()
            .find(|(tag, _)| *tag == self.0)
            .map(|(_, label)| *label)
            .unwrap_or(self.0.as_str())
    }
}
