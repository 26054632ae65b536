use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{mission::Mission, ExampleData};

/// Payload of a mission ingestion, as sent by the client.
///
/// Every field is optional on the wire so that a missing field surfaces as a
/// validation error with a proper reason instead of a parse failure.
/// Each sub path is a list of `[longitude, latitude]` points.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionSubmission {
    pub owner_user_id: Option<i64>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub sub_paths: Option<Vec<Vec<Vec<f64>>>>,
}

impl ExampleData for MissionSubmission {
    fn example_data() -> Self {
        Self {
            owner_user_id: Some(1),
            duration_minutes: Some(30.0),
            distance_km: Some(2.5),
            sub_paths: Some(vec![vec![
                vec![0.0, 0.0],
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![0.0, 0.0],
            ]]),
        }
    }
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestReceipt {
    pub mission_id: Id<Mission>,
    pub blocks_created: usize,
}
