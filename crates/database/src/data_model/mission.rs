use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    mission::{Mission, MissionOverview},
    user::User,
    WithId,
};
use sqlx::prelude::FromRow;
use territory::database::{MissionRepo, Result};
use utility::id::Id;

use crate::queries::mission::{get_by_owner, insert};
use crate::{PgDatabaseAutocommit, PgDatabaseTransaction};

#[derive(Debug, Clone, FromRow)]
pub struct MissionRow {
    pub id: i64,
    pub owner_user_id: i64,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub submitted_at: DateTime<Utc>,
}

impl MissionRow {
    pub fn to_model(self) -> WithId<Mission> {
        WithId::new(
            Id::new(self.id),
            Mission {
                owner_user_id: Id::new(self.owner_user_id),
                duration_minutes: self.duration_minutes,
                distance_km: self.distance_km,
                submitted_at: self.submitted_at,
            },
        )
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MissionOverviewRow {
    #[sqlx(flatten)]
    pub mission: MissionRow,
    pub block_count: i64,
}

impl MissionOverviewRow {
    pub fn to_model(self) -> MissionOverview {
        let mission = self.mission.to_model();
        MissionOverview {
            id: mission.id,
            mission: mission.content,
            block_count: self.block_count,
        }
    }
}

#[async_trait]
impl MissionRepo for PgDatabaseAutocommit {
    async fn insert_mission(&mut self, mission: Mission) -> Result<WithId<Mission>> {
        insert(&self.pool, mission).await
    }

    async fn missions_by_owner(
        &mut self,
        owner: &Id<User>,
    ) -> Result<Vec<MissionOverview>> {
        get_by_owner(&self.pool, owner).await
    }
}

#[async_trait]
impl<'a> MissionRepo for PgDatabaseTransaction<'a> {
    async fn insert_mission(&mut self, mission: Mission) -> Result<WithId<Mission>> {
        insert(&mut *self.tx, mission).await
    }

    async fn missions_by_owner(
        &mut self,
        owner: &Id<User>,
    ) -> Result<Vec<MissionOverview>> {
        get_by_owner(&mut *self.tx, owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> MissionRow {
        MissionRow {
            id: 12,
            owner_user_id: 3,
            duration_minutes: 45.0,
            distance_km: 4.2,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_to_mission() {
        let row = row();
        let submitted_at = row.submitted_at;
        let mission = row.to_model();
        assert_eq!(mission.id, Id::new(12));
        assert_eq!(mission.content.owner_user_id, Id::new(3));
        assert_eq!(mission.content.distance_km, 4.2);
        assert_eq!(mission.content.submitted_at, submitted_at);
    }

    #[test]
    fn overview_keeps_block_count() {
        let overview = MissionOverviewRow {
            mission: row(),
            block_count: 4,
        }
        .to_model();
        assert_eq!(overview.id, Id::new(12));
        assert_eq!(overview.block_count, 4);
    }
}
