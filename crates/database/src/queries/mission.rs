use model::{
    mission::{Mission, MissionOverview},
    user::User,
    WithId,
};
use sqlx::{Executor, Postgres};
use territory::database::Result;
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::mission::{MissionOverviewRow, MissionRow};

use super::convert_error;

pub async fn insert<'c, E>(executor: E, mission: Mission) -> Result<WithId<Mission>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO missions(
            owner_user_id,
            duration_minutes,
            distance_km,
            submitted_at
        )
        VALUES ($1, $2, $3, $4)
        RETURNING
            id,
            owner_user_id,
            duration_minutes,
            distance_km,
            submitted_at;
        ",
    )
    .bind(mission.owner_user_id.raw())
    .bind(mission.duration_minutes)
    .bind(mission.distance_km)
    .bind(mission.submitted_at)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: MissionRow| row.to_model())
}

pub async fn get_by_owner<'c, E>(
    executor: E,
    owner: &Id<User>,
) -> Result<Vec<MissionOverview>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            missions.id,
            missions.owner_user_id,
            missions.duration_minutes,
            missions.distance_km,
            missions.submitted_at,
            COUNT(conquered_blocks.id) AS block_count
        FROM
            missions
            LEFT JOIN conquered_blocks
                ON conquered_blocks.mission_id = missions.id
        WHERE
            missions.owner_user_id = $1
        GROUP BY
            missions.id
        ORDER BY
            missions.submitted_at DESC,
            missions.id DESC;
        ",
    )
    .bind(owner.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .into_iter()
    .map(|row: MissionOverviewRow| row.to_model())
    .collect::<Vec<_>>()
    .let_owned(Ok)
}
