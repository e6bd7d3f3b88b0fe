use crate::model::{FetchLogEntry, FetchStatus, JobData, JobRecord, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database, creating the tables on first use.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL,
                source TEXT NOT NULL,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                description TEXT,
                location TEXT,
                job_type TEXT,
                salary_min INTEGER,
                salary_max INTEGER,
                salary_currency TEXT,
                salary_text TEXT,
                url TEXT,
                company_logo TEXT,
                source_category TEXT,
                posted_at TEXT,
                fetched_at TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '',
                UNIQUE (source, external_id)
            );

            CREATE TABLE IF NOT EXISTS fetch_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                status TEXT NOT NULL,
                jobs_fetched INTEGER NOT NULL DEFAULT 0,
                error_message TEXT,
                fetched_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Inserts a job unless `(source, external_id)` is already stored.
    /// Returns true when a new row was written.
    pub fn save_job(
        &self,
        source: &str,
        job: &JobData,
        fetched_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        Self::insert_job(&self.conn, source, job, fetched_at)
    }

    /// Saves a batch in one transaction and returns how many rows were new.
    pub fn save_jobs(
        &mut self,
        source: &str,
        jobs: &[JobData],
        fetched_at: DateTime<Utc>,
    ) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for job in jobs {
            if Self::insert_job(&tx, source, job, fetched_at)? {
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn insert_job(
        conn: &Connection,
        source: &str,
        job: &JobData,
        fetched_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO jobs (
                external_id, source, title, company, description, location, job_type,
                salary_min, salary_max, salary_currency, salary_text, url, company_logo,
                source_category, posted_at, fetched_at, tags
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                &job.external_id,
                source,
                &job.title,
                &job.company,
                &job.description,
                &job.location,
                &job.job_type,
                &job.salary_min,
                &job.salary_max,
                &job.salary_currency,
                &job.salary_text,
                &job.url,
                &job.company_logo,
                &job.source_category,
                &job.posted_at.map(|d| d.to_rfc3339()),
                &fetched_at.to_rfc3339(),
                &job.tags.join(","),
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn log_fetch(
        &self,
        source: &str,
        status: FetchStatus,
        jobs_fetched: usize,
        error: Option<&str>,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO fetch_logs (source, status, jobs_fetched, error_message, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                source,
                status.as_str(),
                jobs_fetched as i64,
                error,
                &fetched_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recent fetch log row for every source, ordered by source name.
    pub fn last_fetch_status(&self) -> Result<Vec<FetchLogEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT source, status, jobs_fetched, error_message, fetched_at
             FROM fetch_logs f
             WHERE id = (SELECT MAX(id) FROM fetch_logs WHERE source = f.source)
             ORDER BY source ASC",
        )?;

        let rows = stmt.query_map([], Self::map_fetch_log)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Every stored job as analyzer input, in insertion order.
    pub fn load_records(&self) -> Result<Vec<JobRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT title, description, source_category, salary_text, salary_min, salary_max
             FROM jobs ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(JobRecord {
                title: row.get(0)?,
                description: row.get(1)?,
                source_category: row.get(2)?,
                salary_text: row.get(3)?,
                salary_min: row.get(4)?,
                salary_max: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn count_jobs(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Job counts per source, ordered by source name.
    pub fn count_by_source(&self) -> Result<Vec<(String, usize)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source, COUNT(*) FROM jobs GROUP BY source ORDER BY source ASC")?;

        let rows = stmt.query_map([], |row| {
            let source: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((source, count as usize))
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn map_fetch_log(row: &Row) -> Result<FetchLogEntry, rusqlite::Error> {
        let jobs_fetched: i64 = row.get(2)?;
        let fetched_at_str: String = row.get(4)?;
        let fetched_at = fetched_at_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(FetchLogEntry {
            source: row.get(0)?,
            status: row.get(1)?,
            jobs_fetched: jobs_fetched as usize,
            error: row.get(3)?,
            fetched_at,
        })
    }
}
