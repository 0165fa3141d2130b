//! UUID utilities

use uuid::Uuid;

/// Generate a new record id (UUIDv4)
pub fn generate() -> Uuid {
    Uuid::new_v4()
}
