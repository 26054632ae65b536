use chrono::{DateTime, Utc};
use model::{
    block::StagedBlock,
    geometry::Coordinate,
    mission::Mission,
    submission::{IngestReceipt, MissionSubmission},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    classifier::shape,
    database::{BlockRepo, Database, DatabaseTransaction, MissionRepo},
    naming::area_name,
    sanitizer::sanitize,
    validation::ValidatedSubmission,
    IngestError,
};

/// Turns mission submissions into a mission and its conquered blocks.
///
/// The ingestor holds no state besides the database handle, so clones can
/// ingest concurrently.
#[derive(Debug, Clone)]
pub struct MissionIngestor<D: Database> {
    database: D,
}

impl<D: Database> MissionIngestor<D> {
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub async fn ingest(
        &self,
        submission: MissionSubmission,
    ) -> Result<IngestReceipt, IngestError> {
        let mut rng = StdRng::from_entropy();
        self.ingest_with_rng(submission, &mut rng).await
    }

    /// Same as [`Self::ingest`], with block labels drawn from `rng`.
    pub async fn ingest_with_rng<R>(
        &self,
        submission: MissionSubmission,
        rng: &mut R,
    ) -> Result<IngestReceipt, IngestError>
    where
        R: Rng + Send,
    {
        let submission = ValidatedSubmission::try_from(submission).map_err(|why| {
            log::warn!("rejected mission submission: {}", why);
            why
        })?;

        let owner = submission.owner_user_id;
        let blocks = stage_blocks(submission.sub_paths, rng);
        let mission = Mission {
            owner_user_id: submission.owner_user_id,
            duration_minutes: submission.duration_minutes,
            distance_km: submission.distance_km,
            submitted_at: Utc::now(),
        };

        let mut tx = self.database.transaction().await.map_err(|why| {
            log::error!("could not open transaction for mission: {}", why);
            why
        })?;

        let result = persist::<D>(&mut tx, mission, blocks).await;
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(why) => {
                log::error!("could not persist mission, rolling back: {}", why);
                if let Err(rollback_why) = tx.rollback().await {
                    log::error!("rollback failed: {}", rollback_why);
                }
                return Err(why.into());
            }
        };

        tx.commit().await.map_err(|why| {
            log::error!("could not commit mission {}: {}", receipt.mission_id, why);
            why
        })?;

        log::info!(
            "stored mission {} of owner {} with {} blocks",
            receipt.mission_id,
            owner,
            receipt.blocks_created
        );
        Ok(receipt)
    }
}

/// Sanitizes, shapes and labels each trace in submission order. Traces
/// without movement are skipped.
pub fn stage_blocks<R>(sub_paths: Vec<Vec<Coordinate>>, rng: &mut R) -> Vec<StagedBlock>
where
    R: Rng + ?Sized,
{
    sub_paths
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let path = sanitize(&raw);
            if !path.has_movement() {
                log::debug!(
                    "skipping sub path {}: {} distinct points",
                    index,
                    path.len()
                );
                return None;
            }
            Some(StagedBlock {
                label: area_name(&mut *rng),
                geometry: shape(path),
            })
        })
        .collect()
}

async fn persist<D: Database>(
    tx: &mut D::Transaction,
    mission: Mission,
    blocks: Vec<StagedBlock>,
) -> crate::database::Result<IngestReceipt> {
    let created_at: DateTime<Utc> = mission.submitted_at;
    let mission = tx.insert_mission(mission).await?;

    let blocks = blocks
        .into_iter()
        .map(|block| block.attach(mission.id, created_at))
        .collect::<Vec<_>>();

    let mut blocks_created = 0;
    for chunk in blocks.chunks(D::BULK_INSERT_MAX) {
        blocks_created += tx.insert_blocks(chunk).await?.len();
    }

    Ok(IngestReceipt {
        mission_id: mission.id,
        blocks_created,
    })
}
