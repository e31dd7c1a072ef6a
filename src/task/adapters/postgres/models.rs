//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned task identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Execution status.
    pub status: String,
    /// Process identifier of the most recent launch.
    pub runner_pid: Option<i64>,
    /// Output captured by the most recent finished attempt.
    pub output: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records; the identifier is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Initial execution status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for task records.
///
/// `None` values are written as `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Execution status.
    pub status: String,
    /// Process identifier of the most recent launch.
    pub runner_pid: Option<i64>,
    /// Output captured by the most recent finished attempt.
    pub output: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
