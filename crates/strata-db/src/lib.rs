pub mod ddl;
pub mod provider;
pub mod query;
pub mod schema;
pub mod sqlite;

pub use provider::{DatabaseProvider, open_provider};
pub use schema::{Column, Condition, Fields, ModelObject, Table, Value};
pub use sqlite::SqliteProvider;
