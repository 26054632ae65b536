use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

/// Marker for accounts. Accounts are managed outside this workspace; only
/// their ids are referenced here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User;

impl HasId for User {
    type IdType = i64;
}
