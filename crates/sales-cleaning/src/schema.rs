//! Typed column-role lookup.
//!
//! Each stage locates the columns it cares about through a [`SchemaDescriptor`]:
//! an ordered list of semantic roles, each paired with a matching rule. A
//! descriptor is resolved once per stage against the frame's column names;
//! for every role the first column (in column order) that satisfies the rule
//! wins.
//!
//! The descriptors are deliberately not shared between stages. The resolver
//! only fills a quantity column named exactly `quantity` or `qty`, while the
//! row filter checks any column whose name contains either word.

use serde::{Deserialize, Serialize};

/// Semantic role a column can play in a sales dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Price,
    Quantity,
    ProductName,
    Category,
}

impl ColumnRole {
    /// Returns a human-readable name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::ProductName => "product name",
            Self::Category => "category",
        }
    }
}

/// Rule deciding whether a column name plays a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatcher {
    /// Name equals one of the listed names (case-sensitive).
    Exact(&'static [&'static str]),
    /// Name contains one of the listed substrings (case-sensitive).
    Contains(&'static [&'static str]),
}

impl ColumnMatcher {
    pub fn matches(&self, column: &str) -> bool {
        match self {
            Self::Exact(names) => names.contains(&column),
            Self::Contains(needles) => needles.iter().any(|needle| column.contains(needle)),
        }
    }
}

/// A role paired with its matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRule {
    pub role: ColumnRole,
    pub matcher: ColumnMatcher,
}

impl RoleRule {
    pub const fn new(role: ColumnRole, matcher: ColumnMatcher) -> Self {
        Self { role, matcher }
    }
}

/// Ordered set of role rules evaluated against a column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    rules: Vec<RoleRule>,
}

impl SchemaDescriptor {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        Self { rules }
    }

    /// Headers the loader coerces, matched against trimmed raw header names.
    pub fn raw_input() -> Self {
        Self::new(vec![
            RoleRule::new(ColumnRole::Price, ColumnMatcher::Exact(&["PRICE"])),
            RoleRule::new(ColumnRole::Quantity, ColumnMatcher::Exact(&["Quantity"])),
        ])
    }

    /// Text columns trimmed by the normalizer.
    pub fn text_fields() -> Self {
        Self::new(vec![
            RoleRule::new(ColumnRole::ProductName, ColumnMatcher::Exact(&["product_name"])),
            RoleRule::new(ColumnRole::Category, ColumnMatcher::Exact(&["category"])),
        ])
    }

    /// Columns filled by the missing-value resolver.
    pub fn imputation() -> Self {
        Self::new(vec![
            RoleRule::new(ColumnRole::Price, ColumnMatcher::Contains(&["price"])),
            RoleRule::new(ColumnRole::Quantity, ColumnMatcher::Exact(&["quantity", "qty"])),
        ])
    }

    /// Columns checked by the invalid-row filter.
    pub fn validation() -> Self {
        Self::new(vec![
            RoleRule::new(ColumnRole::Quantity, ColumnMatcher::Contains(&["quantity", "qty"])),
            RoleRule::new(ColumnRole::Price, ColumnMatcher::Contains(&["price"])),
            RoleRule::new(ColumnRole::ProductName, ColumnMatcher::Exact(&["product_name"])),
        ])
    }

    /// Resolve every rule against `columns`, keeping the first match per role.
    pub fn resolve<I, S>(&self, columns: I) -> ResolvedSchema
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<S> = columns.into_iter().collect();
        let mut resolved: Vec<(ColumnRole, String)> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            if resolved.iter().any(|(role, _)| *role == rule.role) {
                continue;
            }
            if let Some(column) = columns
                .iter()
                .map(|name| name.as_ref())
                .find(|name| rule.matcher.matches(name))
            {
                resolved.push((rule.role, column.to_string()));
            }
        }
        ResolvedSchema { columns: resolved }
    }
}

/// Result of resolving a [`SchemaDescriptor`]: role → column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    columns: Vec<(ColumnRole, String)>,
}

impl ResolvedSchema {
    /// Column bound to `role`, if any.
    pub fn column(&self, role: ColumnRole) -> Option<&str> {
        self.columns
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, name)| name.as_str())
    }

    /// Bound roles in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.columns.iter().map(|(role, name)| (*role, name.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
