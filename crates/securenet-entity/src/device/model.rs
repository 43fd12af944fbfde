//! Device record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use securenet_core::types::id::DeviceId;

/// A remote machine known to the hub.
///
/// At most one record exists per `name`. Records are created on the first
/// registration of an unseen name and are never deleted by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Store-assigned identifier.
    pub id: DeviceId,
    /// Logical device identity, used as the command routing key.
    pub name: String,
    /// Last-known network address (informational).
    pub address: String,
    /// Opaque access code presented by the device.
    pub access_code: String,
    /// Cached connection state.
    pub connected: bool,
    /// When the device first registered.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields presented by a device when it registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    /// Logical device identity.
    pub name: String,
    /// Network address reported by the device.
    pub address: String,
    /// Access code reported by the device.
    pub access_code: String,
}

impl DeviceRecord {
    /// Build a fresh, connected record for a first-time registration.
    pub fn from_registration(registration: &DeviceRegistration) -> Self {
        let now = Utc::now();
        Self {
            id: DeviceId::new(),
            name: registration.name.clone(),
            address: registration.address.clone(),
            access_code: registration.access_code.clone(),
            connected: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the record from a re-registration and mark it connected.
    pub fn apply_registration(&mut self, registration: &DeviceRegistration) {
        self.address = registration.address.clone();
        self.access_code = registration.access_code.clone();
        self.connected = true;
        self.updated_at = Utc::now();
    }

    /// Mark the record disconnected.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(address: &str, code: &str) -> DeviceRegistration {
        DeviceRegistration {
            name: "PC1".to_string(),
            address: address.to_string(),
            access_code: code.to_string(),
        }
    }

    #[test]
    fn test_reregistration_refreshes_fields() {
        let mut record = DeviceRecord::from_registration(&registration("10.0.0.5", "ABC"));
        record.mark_disconnected();
        let id = record.id;

        record.apply_registration(&registration("10.0.0.9", "XYZ"));

        assert_eq!(record.id, id);
        assert_eq!(record.address, "10.0.0.9");
        assert_eq!(record.access_code, "XYZ");
        assert!(record.connected);
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = DeviceRecord::from_registration(&registration("10.0.0.5", "ABC"));
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["name"], "PC1");
        assert_eq!(json["accessCode"], "ABC");
        assert_eq!(json["connected"], true);
    }
}
