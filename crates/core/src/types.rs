/// Row id of every Tripboard table (Postgres `BIGSERIAL`).
pub type DbId = i64;

/// Creation and update times, stored as `TIMESTAMPTZ` and handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
