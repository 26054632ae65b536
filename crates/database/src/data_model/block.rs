use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    block::{BlockListing, ConqueredBlock},
    geometry::{Feature, Geometry, InvalidFeature},
    mission::Mission,
    user::User,
};
use sqlx::{prelude::FromRow, types::Json};
use territory::database::{BlockRepo, Result};
use utility::id::Id;

use crate::queries::block::{get_by_owner, insert_all};
use crate::{PgDatabaseAutocommit, PgDatabaseTransaction};

/// A block row joined with the mission columns it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct BlockListingRow {
    pub id: i64,
    pub mission_id: i64,
    pub label: String,
    pub geometry: Json<Feature>,
    pub created_at: DateTime<Utc>,
    pub owner_user_id: i64,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub submitted_at: DateTime<Utc>,
}

impl BlockListingRow {
    pub fn to_model(self) -> core::result::Result<BlockListing, InvalidFeature> {
        Ok(BlockListing {
            id: Id::new(self.id),
            block: ConqueredBlock {
                mission_id: Id::new(self.mission_id),
                label: self.label,
                geometry: Geometry::from_feature(self.geometry.0)?,
                created_at: self.created_at,
            },
            mission: Mission {
                owner_user_id: Id::new(self.owner_user_id),
                duration_minutes: self.duration_minutes,
                distance_km: self.distance_km,
                submitted_at: self.submitted_at,
            },
        })
    }
}

#[async_trait]
impl BlockRepo for PgDatabaseAutocommit {
    async fn insert_blocks(
        &mut self,
        blocks: &[ConqueredBlock],
    ) -> Result<Vec<Id<ConqueredBlock>>> {
        insert_all(&self.pool, blocks).await
    }

    async fn blocks_by_owner(&mut self, owner: &Id<User>) -> Result<Vec<BlockListing>> {
        get_by_owner(&self.pool, owner).await
    }
}

#[async_trait]
impl<'a> BlockRepo for PgDatabaseTransaction<'a> {
    async fn insert_blocks(
        &mut self,
        blocks: &[ConqueredBlock],
    ) -> Result<Vec<Id<ConqueredBlock>>> {
        insert_all(&mut *self.tx, blocks).await
    }

    async fn blocks_by_owner(&mut self, owner: &Id<User>) -> Result<Vec<BlockListing>> {
        get_by_owner(&mut *self.tx, owner).await
    }
}

#[cfg(test)]
mod tests {
    use model::{block::BlockCategory, geometry::Coordinate};

    use super::*;

    fn row(geometry: Geometry) -> BlockListingRow {
        let now = Utc::now();
        BlockListingRow {
            id: 8,
            mission_id: 2,
            label: "Region Nova-512 Central".to_owned(),
            geometry: Json(geometry.to_feature()),
            created_at: now,
            owner_user_id: 1,
            duration_minutes: 30.0,
            distance_km: 2.5,
            submitted_at: now,
        }
    }

    #[test]
    fn row_maps_to_listing() {
        let geometry = Geometry::LineString {
            points: vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)],
        };
        let listing = row(geometry.clone()).to_model().unwrap();
        assert_eq!(listing.id, Id::new(8));
        assert_eq!(listing.block.mission_id, Id::new(2));
        assert_eq!(listing.block.geometry, geometry);
        assert_eq!(listing.block.category(), BlockCategory::OpenPatrol);
        assert_eq!(listing.mission.owner_user_id, Id::new(1));
    }

    #[test]
    fn polygon_without_ring_is_an_error() {
        let mut row = row(Geometry::Polygon { ring: vec![] });
        row.geometry = Json(Feature {
            geometry: model::geometry::FeatureGeometry::Polygon(vec![]),
            ..row.geometry.0.clone()
        });
        assert_eq!(row.to_model().unwrap_err(), InvalidFeature::MissingRing);
    }
}
