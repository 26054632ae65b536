use model::{
    block::BlockListing,
    mission::{MissionOverview, MissionSummary},
    submission::{IngestReceipt, MissionSubmission},
    user::User,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{self, BlockRepo, Database, MissionRepo},
    ingest::MissionIngestor,
    IngestError,
};

/// Entry point for callers outside the core: one ingestion operation and the
/// read paths over an owner's missions and blocks.
#[derive(Debug, Clone)]
pub struct Client<D: Database> {
    id: String,
    ingestor: MissionIngestor<D>,
    pub database: D,
}

impl<D: Database> Client<D> {
    pub fn new<S>(id: S, database: D) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: id.into(),
            ingestor: MissionIngestor::new(database.clone()),
            database,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn ingest(
        &self,
        submission: MissionSubmission,
    ) -> Result<IngestReceipt, IngestError> {
        log::debug!("{}: ingesting mission", self.id);
        self.ingestor.ingest(submission).await
    }

    /// Blocks of an owner, newest first. Unknown owners simply have none.
    pub async fn blocks(&self, owner: &Id<User>) -> database::Result<Vec<BlockListing>> {
        self.database.auto().blocks_by_owner(owner).await
    }

    pub async fn missions(
        &self,
        owner: &Id<User>,
    ) -> database::Result<Vec<MissionOverview>> {
        self.database.auto().missions_by_owner(owner).await
    }

    pub async fn summary(&self, owner: &Id<User>) -> database::Result<MissionSummary> {
        self.missions(owner)
            .await?
            .let_owned(|missions| MissionSummary::of(missions.iter().map(|m| &m.mission)))
            .let_owned(Ok)
    }
}
