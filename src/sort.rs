//! Permitted product orderings.
//!
//! Sort expressions arrive as text (`"name ASC"`, `"price DESC"`) but are
//! never spliced into SQL as given: they are parsed into [`ProductSort`] and
//! rendered back from a fixed table of column names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Name,
    Price,
    Bought,
}

impl SortKey {
    const fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Bought => "bought",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    const fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl ProductSort {
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub const fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub const fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// Fragment that follows `ORDER BY`.
    pub fn sql(&self) -> String {
        format!("{} {}", self.key.column(), self.direction.keyword())
    }
}

impl Default for ProductSort {
    fn default() -> Self {
        Self::asc(SortKey::Name)
    }
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

impl FromStr for ProductSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidSort(s.to_string());
        let mut words = s.trim().split(' ');

        let key = match words.next().map(str::to_ascii_lowercase).as_deref() {
            Some("id") => SortKey::Id,
            Some("name") => SortKey::Name,
            Some("price") => SortKey::Price,
            Some("bought") => SortKey::Bought,
            _ => return Err(invalid()),
        };
        let direction = match words.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => SortDirection::Asc,
            Some("DESC") => SortDirection::Desc,
            Some(_) => return Err(invalid()),
        };
        if words.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { key, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_application_sort_options() {
        let cases = [
            ("name ASC", ProductSort::asc(SortKey::Name)),
            ("name DESC", ProductSort::desc(SortKey::Name)),
            ("price ASC", ProductSort::asc(SortKey::Price)),
            ("price DESC", ProductSort::desc(SortKey::Price)),
            ("bought DESC", ProductSort::desc(SortKey::Bought)),
            ("id", ProductSort::asc(SortKey::Id)),
            ("Price desc", ProductSort::desc(SortKey::Price)),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<ProductSort>().unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn rejects_anything_else() {
        for text in [
            "",
            "description ASC",
            "name ASC; DROP TABLE shops",
            "name  ASC",
            "name ASC, price DESC",
            "price sideways",
            "name ASC NULLS FIRST",
        ] {
            let err = text.parse::<ProductSort>().unwrap_err();
            assert_eq!(err, CatalogError::InvalidSort(text.to_string()));
        }
    }

    #[test]
    fn renders_fixed_fragments() {
        assert_eq!(ProductSort::default().sql(), "name ASC");
        assert_eq!(ProductSort::desc(SortKey::Bought).to_string(), "bought DESC");
    }
}
