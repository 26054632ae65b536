use std::{error, result};

use async_trait::async_trait;
use model::{
    block::{BlockListing, ConqueredBlock},
    mission::{Mission, MissionOverview},
    user::User,
    WithId,
};
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("the requested item does not exist")]
    NotFound,
    #[error("{0}")]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<E: error::Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait MissionRepo {
    /// Inserts a mission and returns it together with its generated id.
    async fn insert_mission(&mut self, mission: Mission) -> Result<WithId<Mission>>;

    /// All missions of an owner, most recently submitted first.
    async fn missions_by_owner(
        &mut self,
        owner: &Id<User>,
    ) -> Result<Vec<MissionOverview>>;
}

#[async_trait]
pub trait BlockRepo {
    /// Inserts blocks in the given order. Every block must reference a mission
    /// that is visible to this connection.
    ///
    /// ## Warning
    ///
    /// Push at most `Database::BULK_INSERT_MAX` blocks at once.
    async fn insert_blocks(
        &mut self,
        blocks: &[ConqueredBlock],
    ) -> Result<Vec<Id<ConqueredBlock>>>;

    /// All blocks of an owner joined with their missions, newest first. Blocks
    /// created at the same instant are ordered by descending id.
    async fn blocks_by_owner(&mut self, owner: &Id<User>) -> Result<Vec<BlockListing>>;
}

pub trait DatabaseOperations: MissionRepo + BlockRepo {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a mission database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    const BULK_INSERT_MAX: usize;

    /// Opens a transaction. Nothing written through it becomes visible to
    /// other connections before `commit`.
    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
