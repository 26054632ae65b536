use model::{
    block::{BlockListing, ConqueredBlock},
    user::User,
};
use sqlx::{types::Json, Executor, Postgres};
use territory::database::{DatabaseError, Result};
use utility::id::Id;

use crate::data_model::block::BlockListingRow;

use super::{convert_error, insert_all_returning};

pub async fn insert_all<'c, E>(
    executor: E,
    blocks: &[ConqueredBlock],
) -> Result<Vec<Id<ConqueredBlock>>>
where
    E: Executor<'c, Database = Postgres>,
{
    if blocks.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<(i64,)> = insert_all_returning(
        executor,
        "conquered_blocks",
        &["mission_id", "label", "geometry", "created_at"],
        blocks,
        |query, block| {
            query
                .bind(block.mission_id.raw())
                .bind(block.label.clone())
                .bind(Json(block.geometry.to_feature()))
                .bind(block.created_at)
        },
        &["id"],
    )
    .await
    .map_err(convert_error)?;

    Ok(ids.into_iter().map(|(id,)| Id::new(id)).collect())
}

pub async fn get_by_owner<'c, E>(
    executor: E,
    owner: &Id<User>,
) -> Result<Vec<BlockListing>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<BlockListingRow> = sqlx::query_as(
        "
        SELECT
            conquered_blocks.id,
            conquered_blocks.mission_id,
            conquered_blocks.label,
            conquered_blocks.geometry,
            conquered_blocks.created_at,
            missions.owner_user_id,
            missions.duration_minutes,
            missions.distance_km,
            missions.submitted_at
        FROM
            conquered_blocks
            JOIN missions ON missions.id = conquered_blocks.mission_id
        WHERE
            missions.owner_user_id = $1
        ORDER BY
            conquered_blocks.created_at DESC,
            conquered_blocks.id DESC;
        ",
    )
    .bind(owner.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    rows.into_iter()
        .map(|row| row.to_model().map_err(DatabaseError::other))
        .collect()
}
