//! Outlet-group table and the classifier over it.
//!
//! An [`OutletDirectory`] is built once from configuration and passed by
//! reference to everything that needs it; there is no global table. Outlets
//! can be referred to by name or by a numeric code, and the code table varies
//! between crawler revisions, so both live in configuration rather than code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used in logs for outlets outside every group.
pub const UNGROUPED: &str = "기타";

/// A named bucket of outlets with in-group priorities (lower is preferred).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutletGroup {
    pub name: String,
    pub members: BTreeMap<String, u32>,
}

impl OutletGroup {
    pub fn new<'a>(name: &str, members: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            name: name.to_string(),
            members: members
                .into_iter()
                .map(|(outlet, rank)| (outlet.to_string(), rank))
                .collect(),
        }
    }
}

/// In-group preference of an outlet. `Unranked` sorts after every rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Rank(u32),
    Unranked,
}

/// Result of classifying one outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Name of the first group listing the outlet, `None` when ungrouped.
    pub group: Option<&'a str>,
    pub priority: Priority,
}

impl Classification<'_> {
    pub const UNGROUPED: Classification<'static> = Classification {
        group: None,
        priority: Priority::Unranked,
    };

    /// Group name for display, with [`UNGROUPED`] for ungrouped outlets.
    pub fn group_name(&self) -> &str {
        self.group.unwrap_or(UNGROUPED)
    }
}

/// Immutable outlet-group table plus the outlet-code table.
#[derive(Debug, Clone, PartialEq)]
pub struct OutletDirectory {
    groups: Vec<OutletGroup>,
    codes: BTreeMap<String, String>,
}

impl OutletDirectory {
    pub fn new(groups: Vec<OutletGroup>, codes: BTreeMap<String, String>) -> Self {
        Self { groups, codes }
    }

    /// Groups in declared order.
    pub fn groups(&self) -> &[OutletGroup] {
        &self.groups
    }

    /// Resolve an outlet code to its name; names pass through trimmed.
    pub fn resolve<'a>(&'a self, outlet: &'a str) -> &'a str {
        let outlet = outlet.trim();
        self.codes.get(outlet).map(String::as_str).unwrap_or(outlet)
    }

    /// Map an outlet to its group and priority.
    ///
    /// The first group in declared order that lists the outlet wins. Total:
    /// unknown outlets are [`Classification::UNGROUPED`].
    pub fn classify(&self, outlet: &str) -> Classification<'_> {
        let name = self.resolve(outlet);
        self.groups
            .iter()
            .find_map(|g| {
                g.members.get(name).map(|&rank| Classification {
                    group: Some(g.name.as_str()),
                    priority: Priority::Rank(rank),
                })
            })
            .unwrap_or(Classification::UNGROUPED)
    }
}

impl Default for OutletDirectory {
    /// The production table: conservative, progressive and financial press.
    fn default() -> Self {
        Self::new(
            vec![
                OutletGroup::new("보수", [("조선일보", 1), ("중앙일보", 2), ("동아일보", 3)]),
                OutletGroup::new("진보", [("경향신문", 1), ("한겨레신문", 2), ("한국일보", 3)]),
                OutletGroup::new(
                    "경제",
                    [("매일경제", 1), ("한국경제", 2), ("서울경제", 3), ("아주경제", 4)],
                ),
            ],
            BTreeMap::new(),
        )
    }
}
