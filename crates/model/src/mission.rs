use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::user::User;

/// One recorded outing. Metrics are supplied by the client and never
/// recomputed from geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub owner_user_id: Id<User>,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub submitted_at: DateTime<Utc>,
}

impl HasId for Mission {
    type IdType = i64;
}

/// Aggregated metrics over every mission of one owner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionSummary {
    pub mission_count: i64,
    pub total_duration_minutes: f64,
    #[serde(serialize_with = "utility::serde::round_2")]
    pub total_distance_km: f64,
}

impl MissionSummary {
    pub fn of<'a, I>(missions: I) -> Self
    where
        I: IntoIterator<Item = &'a Mission>,
    {
        missions
            .into_iter()
            .fold(Self::default(), |summary, mission| Self {
                mission_count: summary.mission_count + 1,
                total_duration_minutes: summary.total_duration_minutes
                    + mission.duration_minutes,
                total_distance_km: summary.total_distance_km + mission.distance_km,
            })
    }
}

/// A mission together with the number of blocks it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionOverview {
    pub id: Id<Mission>,
    pub mission: Mission,
    pub block_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission(duration_minutes: f64, distance_km: f64) -> Mission {
        Mission {
            owner_user_id: Id::new(1),
            duration_minutes,
            distance_km,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(
            MissionSummary::of(Vec::<Mission>::new().iter()),
            MissionSummary::default()
        );
    }

    #[test]
    fn summary_adds_up_metrics() {
        let missions = vec![mission(30.0, 2.5), mission(15.0, 1.25)];
        let summary = MissionSummary::of(&missions);
        assert_eq!(summary.mission_count, 2);
        assert_eq!(summary.total_duration_minutes, 45.0);
        assert_eq!(summary.total_distance_km, 3.75);
    }

    #[test]
    fn summary_rounds_distance_on_output() {
        let summary = MissionSummary {
            mission_count: 1,
            total_duration_minutes: 10.0,
            total_distance_km: 1.23456,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["totalDistanceKm"], serde_json::json!(1.23));
    }
}
