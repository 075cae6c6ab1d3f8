use rusqlite::{params, Connection, Error as SqlError, ErrorCode};
use tracing::debug;

use super::error::{StoreError, StoreResult};
use crate::models::Category;

/// Retrieve every category name, sorted case-insensitively so mixed-case
/// labels group together in pickers.
pub fn fetch_categories(conn: &Connection) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name COLLATE NOCASE")?;
    let categories = stmt
        .query_map([], |row| Ok(Category { name: row.get(0)? }))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

/// Insert a new category label. Uniqueness is enforced here by the primary
/// key rather than by a caller-side pre-check, which closes the race between
/// checking for a duplicate and inserting it.
pub fn create_category(conn: &Connection, name: &str) -> StoreResult<Category> {
    conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name])
        .map_err(|err| map_unique_constraint(err, name))?;

    debug!(name, "inserted category");
    Ok(Category {
        name: name.to_string(),
    })
}

/// Rename a category and rewrite every plant that references the old name in
/// the same transaction, so a rename can never leave plants pointing at a
/// label that no longer exists.
pub fn rename_category(conn: &mut Connection, old_name: &str, new_name: &str) -> StoreResult<()> {
    let tx = conn.transaction()?;

    let updated = tx
        .execute(
            "UPDATE categories SET name = ?1 WHERE name = ?2",
            params![new_name, old_name],
        )
        .map_err(|err| map_unique_constraint(err, new_name))?;

    if updated == 0 {
        return Err(StoreError::CategoryNotFound(old_name.to_string()));
    }

    tx.execute(
        "UPDATE plants SET category = ?1 WHERE category = ?2",
        params![new_name, old_name],
    )?;

    tx.commit()?;
    debug!(old_name, new_name, "renamed category");
    Ok(())
}

/// Remove a set of categories in one transaction, clearing the reference on
/// any plant that pointed at them. Names that do not exist are skipped
/// silently, matching set semantics. The per-name statements commit together,
/// so either every requested deletion is durable or none is.
pub fn delete_categories(conn: &mut Connection, names: &[String]) -> StoreResult<()> {
    let tx = conn.transaction()?;

    {
        let mut clear_refs = tx.prepare("UPDATE plants SET category = NULL WHERE category = ?1")?;
        let mut delete = tx.prepare("DELETE FROM categories WHERE name = ?1")?;
        for name in names {
            clear_refs.execute(params![name])?;
            let deleted = delete.execute(params![name])?;
            debug!(name = name.as_str(), deleted, "removed category");
        }
    }

    tx.commit()?;
    Ok(())
}

/// Coerce SQLite constraint errors into the typed duplicate-name error. The
/// only constraint on this table is the primary key, so any violation means
/// the name is already taken.
fn map_unique_constraint(err: SqlError, name: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::CategoryExists(name.to_string())
    } else {
        StoreError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::db::plants::{create_plant, fetch_plants};
    use crate::models::NewPlant;

    fn categorized_plant(name: &str, category: &str) -> NewPlant {
        NewPlant {
            name: name.to_string(),
            species: "Monstera deliciosa".to_string(),
            owned_since: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            water_frequency: 7,
            repot_frequency: 30,
            prune_frequency: 14,
            image: String::new(),
            notes: String::new(),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn categories_list_sorted_without_case() -> Result<()> {
        let conn = open_in_memory()?;
        create_category(&conn, "succulents")?;
        create_category(&conn, "Herbs")?;
        create_category(&conn, "Tropical")?;

        let names: Vec<String> = fetch_categories(&conn)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Herbs", "succulents", "Tropical"]);
        Ok(())
    }

    #[test]
    fn duplicate_category_names_are_rejected() -> Result<()> {
        let conn = open_in_memory()?;
        create_category(&conn, "Herbs")?;

        let err = create_category(&conn, "Herbs").unwrap_err();
        assert!(matches!(err, StoreError::CategoryExists(name) if name == "Herbs"));
        assert_eq!(fetch_categories(&conn)?.len(), 1);
        Ok(())
    }

    #[test]
    fn rename_rewrites_referencing_plants() -> Result<()> {
        let mut conn = open_in_memory()?;
        create_category(&conn, "Herbs")?;
        create_plant(&conn, &categorized_plant("Basil", "Herbs"))?;
        create_plant(&conn, &categorized_plant("Cactus", "Desert"))?;

        rename_category(&mut conn, "Herbs", "Kitchen Herbs")?;

        let names: Vec<String> = fetch_categories(&conn)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Kitchen Herbs"]);

        let plants = fetch_plants(&conn)?;
        assert_eq!(plants[0].category.as_deref(), Some("Kitchen Herbs"));
        // Plants referencing other labels stay untouched.
        assert_eq!(plants[1].category.as_deref(), Some("Desert"));
        Ok(())
    }

    #[test]
    fn rename_of_missing_category_is_reported() -> Result<()> {
        let mut conn = open_in_memory()?;
        let err = rename_category(&mut conn, "Ghost", "Anything").unwrap_err();
        assert!(matches!(err, StoreError::CategoryNotFound(name) if name == "Ghost"));
        Ok(())
    }

    #[test]
    fn rename_onto_existing_name_is_rejected() -> Result<()> {
        let mut conn = open_in_memory()?;
        create_category(&conn, "Herbs")?;
        create_category(&conn, "Tropical")?;

        let err = rename_category(&mut conn, "Herbs", "Tropical").unwrap_err();
        assert!(matches!(err, StoreError::CategoryExists(name) if name == "Tropical"));
        Ok(())
    }

    #[test]
    fn batch_delete_clears_plant_references() -> Result<()> {
        let mut conn = open_in_memory()?;
        create_category(&conn, "Herbs")?;
        create_category(&conn, "Tropical")?;
        create_category(&conn, "Desert")?;
        create_plant(&conn, &categorized_plant("Basil", "Herbs"))?;
        create_plant(&conn, &categorized_plant("Monstera", "Tropical"))?;

        delete_categories(
            &mut conn,
            &["Herbs".to_string(), "Tropical".to_string()],
        )?;

        let names: Vec<String> = fetch_categories(&conn)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Desert"]);

        for plant in fetch_plants(&conn)? {
            assert_eq!(plant.category, None);
        }
        Ok(())
    }

    #[test]
    fn deleting_unknown_names_is_silent() -> Result<()> {
        let mut conn = open_in_memory()?;
        create_category(&conn, "Herbs")?;

        delete_categories(&mut conn, &["Ghost".to_string()])?;
        assert_eq!(fetch_categories(&conn)?.len(), 1);
        Ok(())
    }
}
