//! A process local database, used by tests and for running without postgres.
//!
//! Transactions buffer their writes and apply them under a single lock on
//! commit, so readers see either all rows of a transaction or none.

use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use indexmap::IndexMap;
use itertools::Itertools;
use model::{
    block::{BlockListing, ConqueredBlock},
    mission::{Mission, MissionOverview},
    user::User,
    WithId,
};
use tokio::sync::Mutex;
use utility::id::Id;

use crate::database::{
    BlockRepo, Database, DatabaseAutocommit, DatabaseError, DatabaseOperations,
    DatabaseTransaction, MissionRepo, Result,
};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("injected failure: {0}")]
    Injected(&'static str),

    #[error("block references unknown mission {0}")]
    UnknownMission(i64),

    #[error("{0} blocks exceed the bulk insert limit")]
    BatchTooLarge(usize),
}

#[derive(Debug, Default, Clone)]
struct Tables {
    missions: IndexMap<i64, Mission>,
    blocks: IndexMap<i64, ConqueredBlock>,
}

impl Tables {
    fn insert_blocks(&mut self, blocks: Vec<(i64, ConqueredBlock)>) -> Result<()> {
        for (_, block) in blocks.iter() {
            let mission_id = block.mission_id.raw();
            if !self.missions.contains_key(&mission_id) {
                return Err(DatabaseError::other(InMemoryError::UnknownMission(
                    mission_id,
                )));
            }
        }
        self.blocks.extend(blocks);
        Ok(())
    }

    fn missions_by_owner(&self, owner: &Id<User>) -> Vec<MissionOverview> {
        self.missions
            .iter()
            .filter(|(_, mission)| &mission.owner_user_id == owner)
            .map(|(id, mission)| MissionOverview {
                id: Id::new(*id),
                mission: mission.clone(),
                block_count: self
                    .blocks
                    .values()
                    .filter(|block| block.mission_id.raw() == *id)
                    .count() as i64,
            })
            .sorted_by(|a, b| {
                b.mission
                    .submitted_at
                    .cmp(&a.mission.submitted_at)
                    .then(b.id.cmp(&a.id))
            })
            .collect()
    }

    fn blocks_by_owner(&self, owner: &Id<User>) -> Vec<BlockListing> {
        self.blocks
            .iter()
            .filter_map(|(id, block)| {
                self.missions
                    .get(&block.mission_id.raw())
                    .filter(|mission| &mission.owner_user_id == owner)
                    .map(|mission| BlockListing {
                        id: Id::new(*id),
                        block: block.clone(),
                        mission: mission.clone(),
                    })
            })
            .sorted_by(|a, b| {
                b.block
                    .created_at
                    .cmp(&a.block.created_at)
                    .then(b.id.cmp(&a.id))
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    tables: Mutex<Tables>,
    next_mission_id: AtomicI64,
    next_block_id: AtomicI64,
    fail_block_inserts: AtomicBool,
    fail_commits: AtomicBool,
}

impl State {
    fn mission_id(&self) -> i64 {
        self.next_mission_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn block_id(&self) -> i64 {
        self.next_block_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Same limit a postgres statement has on its bind parameters.
    fn check_batch(&self, len: usize) -> Result<()> {
        if len > <InMemoryDatabase as Database>::BULK_INSERT_MAX {
            Err(DatabaseError::other(InMemoryError::BatchTooLarge(len)))
        } else {
            Ok(())
        }
    }

    fn check(&self, flag: &AtomicBool, what: &'static str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(DatabaseError::other(InMemoryError::Injected(what)))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<State>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following block insert fail until reset.
    pub fn fail_block_inserts(&self, fail: bool) {
        self.state.fail_block_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every following commit fail until reset.
    pub fn fail_commits(&self, fail: bool) {
        self.state.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub async fn mission_count(&self) -> usize {
        self.state.tables.lock().await.missions.len()
    }

    pub async fn block_count(&self) -> usize {
        self.state.tables.lock().await.blocks.len()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    type Autocommit = InMemoryAutocommit;

    const BULK_INSERT_MAX: usize = 999;

    async fn transaction(&self) -> Result<Self::Transaction> {
        Ok(InMemoryTransaction {
            state: self.state.clone(),
            missions: vec![],
            blocks: vec![],
        })
    }

    fn auto(&self) -> Self::Autocommit {
        InMemoryAutocommit {
            state: self.state.clone(),
        }
    }
}

// - autocommit -

pub struct InMemoryAutocommit {
    state: Arc<State>,
}

impl DatabaseAutocommit for InMemoryAutocommit {}
impl DatabaseOperations for InMemoryAutocommit {}

#[async_trait]
impl MissionRepo for InMemoryAutocommit {
    async fn insert_mission(&mut self, mission: Mission) -> Result<WithId<Mission>> {
        let id = self.state.mission_id();
        self.state
            .tables
            .lock()
            .await
            .missions
            .insert(id, mission.clone());
        Ok(WithId::new(Id::new(id), mission))
    }

    async fn missions_by_owner(
        &mut self,
        owner: &Id<User>,
    ) -> Result<Vec<MissionOverview>> {
        Ok(self.state.tables.lock().await.missions_by_owner(owner))
    }
}

#[async_trait]
impl BlockRepo for InMemoryAutocommit {
    async fn insert_blocks(
        &mut self,
        blocks: &[ConqueredBlock],
    ) -> Result<Vec<Id<ConqueredBlock>>> {
        self.state
            .check(&self.state.fail_block_inserts, "block insert")?;
        self.state.check_batch(blocks.len())?;
        let mut rows = Vec::with_capacity(blocks.len());
        for block in blocks {
            rows.push((self.state.block_id(), block.clone()));
        }
        let ids: Vec<Id<ConqueredBlock>> =
            rows.iter().map(|(id, _)| Id::new(*id)).collect();
        self.state.tables.lock().await.insert_blocks(rows)?;
        Ok(ids)
    }

    async fn blocks_by_owner(&mut self, owner: &Id<User>) -> Result<Vec<BlockListing>> {
        Ok(self.state.tables.lock().await.blocks_by_owner(owner))
    }
}

// - transaction -

pub struct InMemoryTransaction {
    state: Arc<State>,
    missions: Vec<(i64, Mission)>,
    blocks: Vec<(i64, ConqueredBlock)>,
}

impl InMemoryTransaction {
    /// Committed rows overlaid with the writes of this transaction.
    async fn view(&self) -> Result<Tables> {
        let mut tables = self.state.tables.lock().await.clone();
        tables.missions.extend(self.missions.iter().cloned());
        tables.insert_blocks(self.blocks.clone())?;
        Ok(tables)
    }
}

impl DatabaseOperations for InMemoryTransaction {}

#[async_trait]
impl DatabaseTransaction for InMemoryTransaction {
    async fn commit(self) -> Result<()> {
        self.state.check(&self.state.fail_commits, "commit")?;
        let mut tables = self.state.tables.lock().await;
        let mut staged = tables.clone();
        staged.missions.extend(self.missions);
        staged.insert_blocks(self.blocks)?;
        *tables = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl MissionRepo for InMemoryTransaction {
    async fn insert_mission(&mut self, mission: Mission) -> Result<WithId<Mission>> {
        let id = self.state.mission_id();
        self.missions.push((id, mission.clone()));
        Ok(WithId::new(Id::new(id), mission))
    }

    async fn missions_by_owner(
        &mut self,
        owner: &Id<User>,
    ) -> Result<Vec<MissionOverview>> {
        Ok(self.view().await?.missions_by_owner(owner))
    }
}

#[async_trait]
impl BlockRepo for InMemoryTransaction {
    async fn insert_blocks(
        &mut self,
        blocks: &[ConqueredBlock],
    ) -> Result<Vec<Id<ConqueredBlock>>> {
        self.state
            .check(&self.state.fail_block_inserts, "block insert")?;
        self.state.check_batch(blocks.len())?;
        let mut ids = Vec::with_capacity(blocks.len());
        for block in blocks {
            let mission_id = block.mission_id.raw();
            let known = self.missions.iter().any(|(id, _)| *id == mission_id)
                || self
                    .state
                    .tables
                    .lock()
                    .await
                    .missions
                    .contains_key(&mission_id);
            if !known {
                return Err(DatabaseError::other(InMemoryError::UnknownMission(
                    mission_id,
                )));
            }
            let id = self.state.block_id();
            self.blocks.push((id, block.clone()));
            ids.push(Id::new(id));
        }
        Ok(ids)
    }

    async fn blocks_by_owner(&mut self, owner: &Id<User>) -> Result<Vec<BlockListing>> {
        Ok(self.view().await?.blocks_by_owner(owner))
    }
}
