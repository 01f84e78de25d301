//! # Data Models
//!
//! SeaORM entities for users, firms, vehicles and sale records, plus the
//! service info payload returned by the root endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod firm;
pub mod record;
pub mod user;
pub mod vehicle;

pub use firm::Entity as Firm;
pub use record::Entity as Record;
pub use user::Entity as User;
pub use vehicle::Entity as Vehicle;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "plate-ledger".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
