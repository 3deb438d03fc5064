/// Campaigns are addressed by opaque UUIDv4 identifiers, generated at
/// creation and immutable for the lifetime of the record.
pub type CampaignId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
