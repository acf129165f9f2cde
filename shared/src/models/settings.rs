//! Store settings (the single-row `config` table)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// App-wide store settings, loaded explicitly where needed rather than held
/// as a process-wide global so handlers stay testable in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub admin_whatsapp: String,
    pub store_name: String,
    pub currency: String,
    pub pickup_address: String,
    pub pickup_coordinates: Option<String>,
    pub pickup_map_link: Option<String>,
    pub updated_at: DateTime<Utc>,
}
