//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StoreError, StoreResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

fn schema_error(message: String) -> StoreError {
    StoreError::Backend(BackendError::MigrationFailed { message })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    // Check current version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        // Fresh database - create base schema then run all migrations
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        migrate_schema(conn, 1)?;
    } else if current_version < SCHEMA_VERSION {
        // Run migrations
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

/// Get the current schema version.
pub fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    // Create version table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| schema_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| schema_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| schema_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1): the four entity tables and their
/// filter-column indexes.
fn create_schema_v1(conn: &Connection) -> StoreResult<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS lands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference_number TEXT NOT NULL UNIQUE,
            headquarters TEXT,
            district TEXT,
            area_size REAL,
            usage_status TEXT,
            approval_status TEXT,
            phase TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS buildings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            building_number TEXT NOT NULL UNIQUE,
            name TEXT,
            governorate TEXT,
            district TEXT,
            stage TEXT,
            affiliation TEXT,
            usage_status TEXT,
            education_type TEXT,
            classroom_count INTEGER,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS rentals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identification_number TEXT NOT NULL UNIQUE,
            building_name TEXT,
            governorate TEXT,
            status TEXT,
            substatus TEXT,
            building_type TEXT,
            monthly_rent REAL,
            maintenance_required INTEGER,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS displacements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference_number TEXT NOT NULL UNIQUE,
            building_code TEXT,
            building_name TEXT,
            displacement_type TEXT,
            status TEXT,
            compensation_amount REAL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        // Indexes over the search whitelists and the ordering key
        "CREATE INDEX IF NOT EXISTS idx_lands_headquarters ON lands(headquarters)",
        "CREATE INDEX IF NOT EXISTS idx_lands_usage_status ON lands(usage_status)",
        "CREATE INDEX IF NOT EXISTS idx_lands_approval_status ON lands(approval_status)",
        "CREATE INDEX IF NOT EXISTS idx_lands_phase ON lands(phase)",
        "CREATE INDEX IF NOT EXISTS idx_lands_created ON lands(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_governorate ON buildings(governorate)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_stage ON buildings(stage)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_affiliation ON buildings(affiliation)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_usage_status ON buildings(usage_status)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_education_type ON buildings(education_type)",
        "CREATE INDEX IF NOT EXISTS idx_buildings_created ON buildings(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_rentals_status ON rentals(status)",
        "CREATE INDEX IF NOT EXISTS idx_rentals_substatus ON rentals(substatus)",
        "CREATE INDEX IF NOT EXISTS idx_rentals_building_type ON rentals(building_type)",
        "CREATE INDEX IF NOT EXISTS idx_rentals_created ON rentals(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_displacements_building_code ON displacements(building_code)",
        "CREATE INDEX IF NOT EXISTS idx_displacements_type ON displacements(displacement_type)",
        "CREATE INDEX IF NOT EXISTS idx_displacements_status ON displacements(status)",
        "CREATE INDEX IF NOT EXISTS idx_displacements_created ON displacements(created_at)",
    ];

    for sql in &statements {
        conn.execute(sql, [])
            .map_err(|e| schema_error(format!("Failed to create base schema: {}", e)))?;
    }

    Ok(())
}

/// Run migrations from the given version to the current version.
fn migrate_schema(conn: &Connection, from_version: i32) -> StoreResult<()> {
    let mut version = from_version;

    while version < SCHEMA_VERSION {
        match version {
            1 => migrate_v1_to_v2(conn)?,
            _ => {
                return Err(schema_error(format!("Unknown schema version: {}", version)));
            }
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

/// Migrate from schema version 1 to version 2.
///
/// Adds the child collection tables: coordinate points for lands and
/// authority decisions for rentals. Children are removed with their parent.
fn migrate_v1_to_v2(conn: &Connection) -> StoreResult<()> {
    let migrations = [
        "CREATE TABLE IF NOT EXISTS land_coordinates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            land_id INTEGER NOT NULL REFERENCES lands(id) ON DELETE CASCADE,
            point_number INTEGER NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS rental_decisions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rental_id INTEGER NOT NULL REFERENCES rentals(id) ON DELETE CASCADE,
            decision_number TEXT NOT NULL,
            decision_date TEXT NOT NULL,
            decision_type TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_land_coordinates_land
            ON land_coordinates(land_id, point_number)",
        "CREATE INDEX IF NOT EXISTS idx_rental_decisions_rental
            ON rental_decisions(rental_id, decision_date)",
    ];

    for sql in &migrations {
        conn.execute(sql, [])
            .map_err(|e| schema_error(format!("Failed to migrate to v2: {}", e)))?;
    }

    Ok(())
}
