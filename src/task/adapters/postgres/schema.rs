//! Diesel schema for task persistence.
//!
//! The table is provisioned outside the service:
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id          BIGSERIAL PRIMARY KEY,
//!     title       VARCHAR(200) NOT NULL,
//!     description TEXT NOT NULL DEFAULT '',
//!     status      VARCHAR(16) NOT NULL DEFAULT 'pending',
//!     runner_pid  BIGINT,
//!     output      TEXT,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

diesel::table! {
    /// Task records and their latest execution state.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Execution status.
        #[max_length = 16]
        status -> Varchar,
        /// Process identifier of the most recent launch.
        runner_pid -> Nullable<Int8>,
        /// Output captured by the most recent finished attempt.
        output -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
