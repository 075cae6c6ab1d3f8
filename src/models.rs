//! Domain models that mirror the SQLite schema and get passed throughout the
//! application. The intent is that these types stay light-weight data holders
//! so other layers can focus on presentation and persistence logic. Keeping
//! the commentary here means later refactors can reconstruct the assumptions
//! even if other context is lost.

use std::fmt;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

/// Care status derived from the three countdown counters. The variants are
/// persisted as the exact display strings below, so changing either side
/// requires a data migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantState {
    Healthy,
    ToCheck,
    Sick,
}

impl PlantState {
    /// Derive the status from the three countdowns. The branches are checked
    /// in this exact order and are mutually exclusive: a plant with every
    /// countdown at zero is Sick, not merely ToCheck, even though it matches
    /// the any-zero predicate as well.
    pub fn from_countdowns(water: i64, repot: i64, prune: i64) -> PlantState {
        if water == 0 && repot == 0 && prune == 0 {
            PlantState::Sick
        } else if water == 0 || repot == 0 || prune == 0 {
            PlantState::ToCheck
        } else {
            PlantState::Healthy
        }
    }

    /// The canonical string stored in the `status` column and shown in lists.
    pub fn as_str(self) -> &'static str {
        match self {
            PlantState::Healthy => "Healthy",
            PlantState::ToCheck => "To Check",
            PlantState::Sick => "Sick",
        }
    }

    /// Parse a stored status string. Returns `None` for anything that is not
    /// one of the three canonical values.
    pub fn parse(value: &str) -> Option<PlantState> {
        match value {
            "Healthy" => Some(PlantState::Healthy),
            "To Check" => Some(PlantState::ToCheck),
            "Sick" => Some(PlantState::Sick),
            _ => None,
        }
    }
}

impl fmt::Display for PlantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for PlantState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PlantState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        PlantState::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown plant status {text:?}").into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
/// In-memory representation of one owned plant. The struct mirrors rows in
/// the `plants` table; countdown fields count the days remaining until the
/// matching care action is due.
pub struct Plant {
    /// Primary key from the database. We keep this around even when the UI
    /// only needs display information because edit/delete flows bubble the id
    /// back to the persistence layer.
    pub id: i64,
    /// Display name chosen by the owner.
    pub name: String,
    /// Botanical or common species name.
    pub species: String,
    /// Acquisition date; the form layer guarantees it is never in the future.
    pub owned_since: NaiveDate,
    /// Days between waterings.
    pub water_frequency: i64,
    /// Days between repottings.
    pub repot_frequency: i64,
    /// Days between prunings.
    pub prune_frequency: i64,
    /// Days remaining until the next watering, floored at zero.
    pub water_countdown: i64,
    /// Days remaining until the next repotting, floored at zero.
    pub repot_countdown: i64,
    /// Days remaining until the next pruning, floored at zero.
    pub prune_countdown: i64,
    /// Derived care status. Only the derivation rule or an explicit cure may
    /// change this; see [`PlantState::from_countdowns`].
    pub state: PlantState,
    /// Optional image URI, empty when the owner never picked a photo.
    pub image: String,
    /// Free-form notes, empty when absent.
    pub notes: String,
    /// Free-text reference to a [`Category`] name. Not a real foreign key;
    /// the category store keeps it consistent on rename/delete.
    pub category: Option<String>,
}

impl Plant {
    /// Compose a `Name (Species)` string for list rows and search results.
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.name, self.species)
    }
}

#[derive(Debug, Clone)]
/// Input for inserting a plant: everything the owner supplies on the add
/// form. The id, the status, and the countdowns are assigned by the store on
/// insert, so they are deliberately absent here.
pub struct NewPlant {
    pub name: String,
    pub species: String,
    pub owned_since: NaiveDate,
    pub water_frequency: i64,
    pub repot_frequency: i64,
    pub prune_frequency: i64,
    pub image: String,
    pub notes: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A user-defined label grouping plants. The name itself is the primary key;
/// categories have no lifecycle beyond existence.
pub struct Category {
    pub name: String,
}

impl fmt::Display for Category {
    /// Write the category name to any formatter so the type plays nicely with
    /// widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
