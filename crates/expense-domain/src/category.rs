//! Expense categories and the filters built on top of them.

use std::{fmt, str::FromStr};

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

use crate::error::DomainError;

/// Label used by [`CategoryFilter::All`] in text form.
pub const ALL_CATEGORIES_LABEL: &str = "All";

/// The closed set of categories an expense can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Bills,
    Shopping,
    Entertainment,
    Others,
}

impl Category {
    /// Every known category in display order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Travel,
        Category::Bills,
        Category::Shopping,
        Category::Entertainment,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Others => "Others",
        }
    }

    /// Case-insensitive lookup of a known label.
    pub fn from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| DomainError::UnknownCategory(value.trim().into()))
    }
}

/// Category as stored on a record.
///
/// Records created through the ledger always carry a known category. Labels
/// outside the known set can only arrive from an externally edited store and
/// are kept verbatim so they survive a save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryLabel {
    Known(Category),
    Unknown(String),
}

impl CategoryLabel {
    pub fn known(&self) -> Option<Category> {
        match self {
            CategoryLabel::Known(category) => Some(*category),
            CategoryLabel::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryLabel::Known(category) => category.as_str(),
            CategoryLabel::Unknown(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, CategoryLabel::Known(_))
    }
}

impl From<Category> for CategoryLabel {
    fn from(category: Category) -> Self {
        CategoryLabel::Known(category)
    }
}

impl From<String> for CategoryLabel {
    fn from(label: String) -> Self {
        // Stored labels are matched exactly so an unknown spelling round-trips unchanged.
        match Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
        {
            Some(category) => CategoryLabel::Known(category),
            None => CategoryLabel::Unknown(label),
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(CategoryLabel::from(value))
    }
}

/// Selects which records a list view shows by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, label: &CategoryLabel) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => label.known() == Some(*category),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) {
            return Ok(CategoryFilter::All);
        }
        value.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES_LABEL),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(
            " Entertainment ".parse::<Category>().unwrap(),
            Category::Entertainment
        );
        let err = "Pets".parse::<Category>().expect_err("unknown label");
        assert!(matches!(err, DomainError::UnknownCategory(ref label) if label == "Pets"));
    }

    #[test]
    fn unknown_labels_survive_serialization() {
        let label: CategoryLabel = serde_json::from_str("\"Groceries\"").unwrap();
        assert_eq!(label, CategoryLabel::Unknown("Groceries".into()));
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"Groceries\"");

        let known: CategoryLabel = serde_json::from_str("\"Bills\"").unwrap();
        assert_eq!(known, CategoryLabel::Known(Category::Bills));
    }

    #[test]
    fn filter_only_matches_its_own_known_category() {
        let travel = CategoryFilter::Only(Category::Travel);
        assert!(travel.matches(&Category::Travel.into()));
        assert!(!travel.matches(&Category::Food.into()));
        assert!(!travel.matches(&CategoryLabel::Unknown("Travel ".into())));
        assert!(CategoryFilter::All.matches(&CategoryLabel::Unknown("x".into())));
    }

    #[test]
    fn filter_parses_all_keyword() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Shopping".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Shopping)
        );
        assert!("Nope".parse::<CategoryFilter>().is_err());
    }
}
