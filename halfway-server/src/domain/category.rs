//! Place categories and tag classification.
//!
//! OpenStreetMap elements carry free-form tag maps. Each element is mapped
//! to exactly one [`Category`] by walking an ordered rule table; the first
//! matching rule wins.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of categories a meeting place can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Cafe,
    Bar,
    Park,
    Shopping,
    Entertainment,
    Hotel,
    Parking,
    Other,
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl Category {
    /// Every category that maps to a provider tag group.
    pub const SEARCHABLE: [Category; 8] = [
        Category::Restaurant,
        Category::Cafe,
        Category::Bar,
        Category::Park,
        Category::Shopping,
        Category::Entertainment,
        Category::Hotel,
        Category::Parking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Bar => "bar",
            Category::Park => "park",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Hotel => "hotel",
            Category::Parking => "parking",
            Category::Other => "other",
        }
    }

    /// Display label used in result lists.
    pub fn label(self) -> &'static str {
        match self {
            Category::Restaurant => "Restaurants",
            Category::Cafe => "Cafes",
            Category::Bar => "Bars",
            Category::Park => "Parks",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Hotel => "Hotels",
            Category::Parking => "Parking",
            Category::Other => "Other",
        }
    }

    /// The `(key, values)` tag filter selecting this category at the provider.
    ///
    /// `Other` has no filter: it is only ever the fallback of [`classify`].
    pub fn tag_filter(self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Category::Restaurant => Some(("amenity", &["restaurant"])),
            Category::Cafe => Some(("amenity", &["cafe"])),
            Category::Bar => Some(("amenity", &["bar", "pub"])),
            Category::Park => Some(("leisure", &["park"])),
            Category::Shopping => Some((
                "shop",
                &[
                    "mall",
                    "department_store",
                    "supermarket",
                    "convenience",
                    "clothing",
                ],
            )),
            Category::Entertainment => Some(("leisure", &["cinema", "theatre", "arts_centre"])),
            Category::Hotel => Some(("tourism", &["hotel"])),
            Category::Parking => Some(("amenity", &["parking"])),
            Category::Other => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Category::SEARCHABLE
            .into_iter()
            .chain(std::iter::once(Category::Other))
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// How a rule inspects a tag value.
enum Match {
    /// The key is present with any value.
    Present,
    /// The key's value is one of these.
    OneOf(&'static [&'static str]),
}

/// Ordered classification rules. Earlier rules take precedence.
const RULES: &[(&str, Match, Category)] = &[
    ("shop", Match::Present, Category::Shopping),
    ("leisure", Match::OneOf(&["park"]), Category::Park),
    (
        "leisure",
        Match::OneOf(&["cinema", "theatre", "arts_centre"]),
        Category::Entertainment,
    ),
    ("tourism", Match::OneOf(&["hotel"]), Category::Hotel),
    ("amenity", Match::OneOf(&["parking"]), Category::Parking),
    ("amenity", Match::OneOf(&["restaurant"]), Category::Restaurant),
    ("amenity", Match::OneOf(&["cafe"]), Category::Cafe),
    ("amenity", Match::OneOf(&["bar", "pub"]), Category::Bar),
];

/// Map a raw tag set to exactly one category.
pub fn classify(tags: &HashMap<String, String>) -> Category {
    RULES
        .iter()
        .find(|(key, rule, _)| {
            tags.get(*key).is_some_and(|value| match rule {
                Match::Present => true,
                Match::OneOf(values) => values.contains(&value.as_str()),
            })
        })
        .map(|(_, _, category)| *category)
        .unwrap_or(Category::Other)
}
