use hickory_proto::rr::Record;

/// A resource record as kept in storage, with its row metadata.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub name: String,
    pub subdomain: String,
    pub record: Record,
    pub created_at: Option<String>,
}

/// Outcome of a committed insert, update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub id: i64,
    /// Zone serial committed together with the change.
    pub serial: u32,
}
