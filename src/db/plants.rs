use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::error::{StoreError, StoreResult};
use crate::models::{NewPlant, Plant, PlantState};

/// Column list shared by every plant query so the row mapper below can rely
/// on one fixed ordering.
const PLANT_COLUMNS: &str = "id, name, species, acquireDate, waterFreq, repotFreq, pruneFreq, \
     status, image, notes, waterCountdown, repotCountdown, pruneCountdown, category";

/// Map one row selected through [`PLANT_COLUMNS`] into a [`Plant`].
fn plant_from_row(row: &Row<'_>) -> rusqlite::Result<Plant> {
    Ok(Plant {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        owned_since: row.get(3)?,
        water_frequency: row.get(4)?,
        repot_frequency: row.get(5)?,
        prune_frequency: row.get(6)?,
        state: row.get(7)?,
        image: row.get(8)?,
        notes: row.get(9)?,
        water_countdown: row.get(10)?,
        repot_countdown: row.get(11)?,
        prune_countdown: row.get(12)?,
        category: row.get(13)?,
    })
}

/// Insert a new plant row, returning the hydrated struct so the caller can
/// push it straight into the in-memory list. Every countdown starts at its
/// matching frequency, and the status comes from the derivation rule applied
/// to those fresh countdowns (Healthy, since frequencies are positive by the
/// form layer's contract; the store does not re-validate).
pub fn create_plant(conn: &Connection, plant: &NewPlant) -> StoreResult<Plant> {
    let state = PlantState::from_countdowns(
        plant.water_frequency,
        plant.repot_frequency,
        plant.prune_frequency,
    );

    conn.execute(
        "INSERT INTO plants (name, species, acquireDate, waterFreq, repotFreq, pruneFreq, \
             status, image, notes, waterCountdown, repotCountdown, pruneCountdown, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            plant.name,
            plant.species,
            plant.owned_since,
            plant.water_frequency,
            plant.repot_frequency,
            plant.prune_frequency,
            state,
            plant.image,
            plant.notes,
            plant.water_frequency,
            plant.repot_frequency,
            plant.prune_frequency,
            plant.category,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, name = %plant.name, "inserted plant");

    Ok(Plant {
        id,
        name: plant.name.clone(),
        species: plant.species.clone(),
        owned_since: plant.owned_since,
        water_frequency: plant.water_frequency,
        repot_frequency: plant.repot_frequency,
        prune_frequency: plant.prune_frequency,
        water_countdown: plant.water_frequency,
        repot_countdown: plant.repot_frequency,
        prune_countdown: plant.prune_frequency,
        state,
        image: plant.image.clone(),
        notes: plant.notes.clone(),
        category: plant.category.clone(),
    })
}

/// Overwrite every mutable field for the row matching `plant.id`. When `cure`
/// is set the stored status is forced to Healthy no matter what the passed-in
/// state says; countdowns are written as given, not recomputed, which models
/// "marking a plant cared for" without restarting its schedule. We surface an
/// explicit error when nothing was updated so the UI can show a friendly
/// message instead of silently continuing.
pub fn update_plant(conn: &Connection, plant: &Plant, cure: bool) -> StoreResult<()> {
    let state = if cure { PlantState::Healthy } else { plant.state };

    let updated = conn.execute(
        "UPDATE plants SET
            name = ?1,
            species = ?2,
            acquireDate = ?3,
            waterFreq = ?4,
            repotFreq = ?5,
            pruneFreq = ?6,
            status = ?7,
            image = ?8,
            notes = ?9,
            waterCountdown = ?10,
            repotCountdown = ?11,
            pruneCountdown = ?12,
            category = ?13
         WHERE id = ?14",
        params![
            plant.name,
            plant.species,
            plant.owned_since,
            plant.water_frequency,
            plant.repot_frequency,
            plant.prune_frequency,
            state,
            plant.image,
            plant.notes,
            plant.water_countdown,
            plant.repot_countdown,
            plant.prune_countdown,
            plant.category,
            plant.id,
        ],
    )?;

    if updated == 0 {
        Err(StoreError::PlantNotFound(plant.id))
    } else {
        debug!(id = plant.id, cure, "updated plant");
        Ok(())
    }
}

/// Remove a plant row. A missing id is a silent no-op: the row the user
/// wanted gone is gone either way, and no other row is touched.
pub fn delete_plant(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn.execute("DELETE FROM plants WHERE id = ?1", params![id])?;
    if deleted == 0 {
        debug!(id, "delete targeted a plant that no longer exists");
    }
    Ok(())
}

/// Clear the whole table. Utility for tests and manual resets only; nothing
/// in the normal application flow calls this.
pub fn delete_all_plants(conn: &Connection) -> StoreResult<()> {
    conn.execute("DELETE FROM plants", [])?;
    Ok(())
}

/// Retrieve every plant in natural storage order. The UI re-runs this on
/// every screen focus, so the in-memory list is always a disposable cache.
pub fn fetch_plants(conn: &Connection) -> StoreResult<Vec<Plant>> {
    let mut stmt = conn.prepare(&format!("SELECT {PLANT_COLUMNS} FROM plants"))?;
    let plants = stmt
        .query_map([], plant_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(plants)
}

/// The `limit` most recently inserted plants, newest first. Ordering is by
/// key descending, so it reflects insertion order rather than last edit.
pub fn fetch_recent_plants(conn: &Connection, limit: u32) -> StoreResult<Vec<Plant>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants ORDER BY id DESC LIMIT ?1"
    ))?;
    let plants = stmt
        .query_map([limit], plant_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(plants)
}

/// Plants whose status says they need attention, i.e. To Check or Sick.
/// Feeds the home screen's "cure" workflow.
pub fn fetch_curable_plants(conn: &Connection) -> StoreResult<Vec<Plant>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants WHERE status = ?1 OR status = ?2"
    ))?;
    let plants = stmt
        .query_map(
            params![PlantState::ToCheck, PlantState::Sick],
            plant_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(plants)
}

/// Case-insensitive substring search over name and species, backing the
/// search tab. An empty query matches everything.
pub fn fetch_plants_matching(conn: &Connection, query: &str) -> StoreResult<Vec<Plant>> {
    let pattern = format!("%{}%", query.trim());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants WHERE name LIKE ?1 OR species LIKE ?1"
    ))?;
    let plants = stmt
        .query_map([pattern], plant_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(plants)
}

/// The daily tick: decrement every countdown by one, floored at zero, then
/// recompute each row's status from the derivation rule. Both steps run in a
/// single transaction so a crash can never leave countdowns decremented but
/// statuses stale.
pub fn advance_countdowns(conn: &mut Connection) -> StoreResult<()> {
    let tx = conn.transaction()?;

    tx.execute(
        "UPDATE plants SET
            waterCountdown = CASE WHEN waterCountdown > 0 THEN waterCountdown - 1 ELSE 0 END,
            repotCountdown = CASE WHEN repotCountdown > 0 THEN repotCountdown - 1 ELSE 0 END,
            pruneCountdown = CASE WHEN pruneCountdown > 0 THEN pruneCountdown - 1 ELSE 0 END",
        [],
    )?;

    {
        let mut select = tx.prepare(
            "SELECT id, waterCountdown, repotCountdown, pruneCountdown FROM plants",
        )?;
        let countdowns = select
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut update = tx.prepare("UPDATE plants SET status = ?1 WHERE id = ?2")?;
        for (id, water, repot, prune) in countdowns {
            let state = PlantState::from_countdowns(water, repot, prune);
            update.execute(params![state, id])?;
        }
    }

    tx.commit()?;
    debug!("advanced care countdowns for all plants");
    Ok(())
}
