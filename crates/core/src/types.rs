/// Server-assigned entity identifier (opaque to the client).
pub type EntityId = String;

/// Monetary amount in whole rupees. The checkout gateway works in minor
/// units (paise); the order endpoint returns amounts already converted.
pub type Amount = i64;
