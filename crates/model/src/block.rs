use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{geometry::Geometry, mission::Mission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    #[serde(rename = "closed area")]
    ClosedArea,
    #[serde(rename = "open patrol")]
    OpenPatrol,
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClosedArea => write!(f, "closed area"),
            Self::OpenPatrol => write!(f, "open patrol"),
        }
    }
}

/// A persisted geographic claim, derived from one trace of a mission.
#[derive(Debug, Clone, PartialEq)]
pub struct ConqueredBlock {
    pub mission_id: Id<Mission>,
    pub label: String,
    pub geometry: Geometry,
    pub created_at: DateTime<Utc>,
}

impl ConqueredBlock {
    pub fn category(&self) -> BlockCategory {
        self.geometry.category()
    }
}

impl HasId for ConqueredBlock {
    type IdType = i64;
}

/// A block that has been shaped and labelled but whose mission does not
/// exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedBlock {
    pub label: String,
    pub geometry: Geometry,
}

impl StagedBlock {
    pub fn attach(self, mission_id: Id<Mission>, created_at: DateTime<Utc>) -> ConqueredBlock {
        ConqueredBlock {
            mission_id,
            label: self.label,
            geometry: self.geometry,
            created_at,
        }
    }
}

/// A block joined with the metrics of the mission that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockListing {
    pub id: Id<ConqueredBlock>,
    pub block: ConqueredBlock,
    pub mission: Mission,
}
