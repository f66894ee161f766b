//! Reference tables: price list, roster and area hierarchy.
//!
//! These are loaded once per session and never mutated here. The lookup helpers are what
//! a data-entry form uses to offer choices, and what the entry builder uses to validate them.

use serde::{Deserialize, Deserializer};

/// One price-list variant: an item, one of its types, and the price as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceRow {
    /// Product name
    pub item: String,
    /// Variant label (size, edition, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Price text, e.g. `"R$ 45,00"`; parsed only when an entry is built
    #[serde(deserialize_with = "price_text")]
    pub unit_price: String,
}

/// One roster row: a person and their role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterRow {
    /// Person name
    pub name: String,
    /// Role held by the person
    pub role: String,
}

/// One hierarchy row: a congregation and the area it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaRow {
    /// Area name
    pub area: String,
    /// Congregation name
    pub congregation: String,
}

/// Accepts the price cell as text or as a bare number.
///
/// TOML and CSV sources may hand over `45` or `12.5` instead of `"R$ 12,50"`.
fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Cell::deserialize(deserializer)? {
        Cell::Text(text) => text,
        Cell::Integer(value) => value.to_string(),
        Cell::Float(value) => value.to_string(),
    })
}

/// Pushes `value` unless it is already present, keeping first-seen order.
fn push_unique<'a>(values: &mut Vec<&'a str>, value: &'a str) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Products and their priced variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceList {
    rows: Vec<PriceRow>,
}

impl PriceList {
    /// Wraps the rows read from a reference source.
    #[must_use]
    pub const fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    /// All rows, in source order.
    #[must_use]
    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    /// True when the source listed no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct product names, in source order.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        let mut items = Vec::new();
        for row in &self.rows {
            push_unique(&mut items, &row.item);
        }
        items
    }

    /// Whether any row names `item`.
    #[must_use]
    pub fn contains_item(&self, item: &str) -> bool {
        self.rows.iter().any(|row| row.item == item)
    }

    /// Variants available for `item`; empty when the item is unknown or has none.
    #[must_use]
    pub fn kinds_for(&self, item: &str) -> Vec<&str> {
        let mut kinds = Vec::new();
        for row in self
            .rows
            .iter()
            .filter(|row| row.item == item && !row.kind.trim().is_empty())
        {
            push_unique(&mut kinds, &row.kind);
        }
        kinds
    }

    /// Raw price text for `(item, kind)`. The first matching row wins.
    #[must_use]
    pub fn price_of(&self, item: &str, kind: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.item == item && row.kind == kind)
            .map(|row| row.unit_price.as_str())
    }
}

/// People who can appear on an entry, with their role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    rows: Vec<RosterRow>,
}

impl Roster {
    /// Wraps the rows read from a reference source.
    #[must_use]
    pub const fn new(rows: Vec<RosterRow>) -> Self {
        Self { rows }
    }

    /// All rows, in source order.
    #[must_use]
    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    /// True when the roster lists nobody.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names in source order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for row in &self.rows {
            push_unique(&mut names, &row.name);
        }
        names
    }

    /// Role of `name`. A person has one role; if the source repeats a name, the first row wins.
    #[must_use]
    pub fn role_of(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .map(|row| row.role.as_str())
    }
}

/// Areas and the congregations under each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaHierarchy {
    rows: Vec<AreaRow>,
}

impl AreaHierarchy {
    /// Wraps the rows read from a reference source.
    #[must_use]
    pub const fn new(rows: Vec<AreaRow>) -> Self {
        Self { rows }
    }

    /// All rows, in source order.
    #[must_use]
    pub fn rows(&self) -> &[AreaRow] {
        &self.rows
    }

    /// True when no congregation is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct areas, in source order.
    #[must_use]
    pub fn areas(&self) -> Vec<&str> {
        let mut areas = Vec::new();
        for row in &self.rows {
            push_unique(&mut areas, &row.area);
        }
        areas
    }

    /// Whether `area` has at least one congregation.
    #[must_use]
    pub fn contains_area(&self, area: &str) -> bool {
        self.rows.iter().any(|row| row.area == area)
    }

    /// Congregations belonging to `area`.
    #[must_use]
    pub fn congregations_in(&self, area: &str) -> Vec<&str> {
        let mut congregations = Vec::new();
        for row in self.rows.iter().filter(|row| row.area == area) {
            push_unique(&mut congregations, &row.congregation);
        }
        congregations
    }

    /// Whether `congregation` belongs to `area`.
    #[must_use]
    pub fn contains(&self, area: &str, congregation: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.area == area && row.congregation == congregation)
    }
}

/// The three reference tables of a session. All three are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    /// Products, variants and prices
    pub price_list: PriceList,
    /// People and roles
    pub roster: Roster,
    /// Areas and congregations
    pub areas: AreaHierarchy,
}
