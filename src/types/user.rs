use serde::{Deserialize, Serialize};

/// Placeholder written for attributes no candidate key could resolve.
pub const NULL_SENTINEL: &str = "NULL";

/// One normalized person, built from exactly one raw item of one source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub source_id: String,
}
