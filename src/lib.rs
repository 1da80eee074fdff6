pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod routes;
pub mod seed;
pub mod utils;
pub mod validation;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}

// With the `mock` feature, sea-orm does not derive Clone on
// DatabaseConnection even though every enabled variant is clonable, so the
// derive above is replaced with the equivalent manual impl.
#[cfg(feature = "mock")]
impl Clone for AppState {
    fn clone(&self) -> Self {
        use DatabaseConnection as DC;
        let db = match &self.db {
            DC::SqlxPostgresPoolConnection(conn) => DC::SqlxPostgresPoolConnection(conn.clone()),
            DC::MockDatabaseConnection(conn) => DC::MockDatabaseConnection(conn.clone()),
            DC::Disconnected => DC::Disconnected,
        };
        Self {
            db,
            config: self.config.clone(),
        }
    }
}
