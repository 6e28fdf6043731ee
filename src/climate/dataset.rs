use super::dates::{one_year_before, parse_iso_date, ISO_DATE_FORMAT};
use crate::error::{AppError, Result};
use crate::types::{DateWindow, Station, TemperatureAggregate};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const STATION_COLUMNS: &[&str] = &["id", "station", "name", "latitude", "longitude", "elevation"];
const MEASUREMENT_COLUMNS: &[&str] = &["station", "date", "prcp", "tobs"];

/// Read-only view over the `station` and `measurement` tables.
///
/// The table layout is discovered from the database file when it is opened;
/// nothing here creates or alters tables.
pub struct Dataset {
    conn: Mutex<Connection>,
}

impl Dataset {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| AppError::Database {
            message: format!("Failed to open climate dataset '{}': {e}", path.display()),
        })?;
        info!("Opened climate dataset at {}", path.display());
        Self::from_connection(conn)
    }

    /// Wrap an existing connection after checking its schema
    pub fn from_connection(conn: Connection) -> Result<Self> {
        reflect_table(&conn, "station", STATION_COLUMNS)?;
        reflect_table(&conn, "measurement", MEASUREMENT_COLUMNS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| AppError::Database {
            message: "climate dataset lock poisoned".to_string(),
        })
    }

    pub fn latest_date(&self) -> Result<Option<NaiveDate>> {
        let latest: Option<String> = self
            .conn()?
            .query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;
        latest.as_deref().map(parse_iso_date).transpose()
    }

    /// Trailing-12-months window ending at the latest measurement date
    pub fn window(&self) -> Result<DateWindow> {
        let latest = self.latest_date()?.ok_or(AppError::EmptyDataset)?;
        Ok(DateWindow {
            start: one_year_before(latest),
            latest,
        })
    }

    /// Precipitation by date from `since` onward, null readings dropped.
    ///
    /// Rows are visited in (date, station) order and a later station's reading
    /// replaces an earlier one for the same date.
    pub fn precipitation(&self, since: NaiveDate) -> Result<BTreeMap<String, f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, prcp FROM measurement
             WHERE date >= ?1 AND prcp IS NOT NULL
             ORDER BY date, station",
        )?;
        let rows = stmt.query_map(params![iso(since)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut by_date = BTreeMap::new();
        for row in rows {
            let (date, prcp) = row?;
            by_date.insert(date, prcp);
        }
        debug!("Precipitation since {}: {} dates", since, by_date.len());
        Ok(by_date)
    }

    /// Stations with at least one measurement from `since` onward, keyed by id
    pub fn active_stations(&self, since: NaiveDate) -> Result<BTreeMap<i64, Station>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, station, name, latitude, longitude, elevation FROM station
             WHERE station IN (SELECT DISTINCT station FROM measurement WHERE date >= ?1)
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![iso(since)], |row| {
            Ok(Station {
                id: row.get(0)?,
                station: row.get(1)?,
                name: row.get(2)?,
                latitude: row.get(3)?,
                longitude: row.get(4)?,
                elevation: row.get(5)?,
            })
        })?;

        let mut stations = BTreeMap::new();
        for row in rows {
            let station = row?;
            stations.insert(station.id, station);
        }
        Ok(stations)
    }

    /// Station code with the most measurements overall; ties go to the lower code
    pub fn most_active_station(&self) -> Result<Option<String>> {
        let station = self
            .conn()?
            .query_row(
                "SELECT station, COUNT(*) AS n FROM measurement
                 GROUP BY station
                 ORDER BY n DESC, station ASC
                 LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(station)
    }

    /// Temperature observations by date for one station from `since` onward
    pub fn temperature_observations(
        &self,
        station: &str,
        since: NaiveDate,
    ) -> Result<BTreeMap<String, f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, tobs FROM measurement
             WHERE station = ?1 AND date >= ?2 AND tobs IS NOT NULL
             ORDER BY date",
        )?;
        let rows = stmt.query_map(params![station, iso(since)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut by_date = BTreeMap::new();
        for row in rows {
            let (date, tobs) = row?;
            by_date.insert(date, tobs);
        }
        Ok(by_date)
    }

    /// Min, max and mean `tobs` over `[start, end]`, both inclusive.
    ///
    /// An inverted range matches no rows and yields all `None`.
    pub fn aggregate(&self, start: NaiveDate, end: NaiveDate) -> Result<TemperatureAggregate> {
        let aggregate = self.conn()?.query_row(
            "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
             WHERE date >= ?1 AND date <= ?2",
            params![iso(start), iso(end)],
            |row| {
                Ok(TemperatureAggregate {
                    min: row.get(0)?,
                    max: row.get(1)?,
                    avg: row.get(2)?,
                })
            },
        )?;
        debug!(%start, %end, ?aggregate, "Temperature aggregate");
        Ok(aggregate)
    }
}

fn iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Check that `table` exists and carries every column in `required`
fn reflect_table(conn: &Connection, table: &str, required: &[&str]) -> Result<()> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(AppError::Schema(format!("table '{table}' not found")));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<HashSet<String>, _>>()?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !columns.contains(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "table '{table}' is missing column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
