use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use model::{
    block::{BlockCategory, BlockListing},
    geometry::Feature,
    mission::{Mission, MissionOverview, MissionSummary},
    user::User,
};
use serde::Serialize;
use territory::database::Database;
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, HateoasResult, RouteErrorResponse, VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/users{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/:owner_user_id/blocks", get(get_blocks::<D>))
        .route("/:owner_user_id/missions", get(get_missions::<D>))
        .route("/:owner_user_id/summary", get(get_summary::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// One row of the conquest listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDto {
    pub id: i64,
    pub label: String,
    pub geometry: Feature,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "utility::serde::round_2")]
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub category: BlockCategory,
}

impl From<BlockListing> for BlockDto {
    fn from(listing: BlockListing) -> Self {
        Self {
            id: listing.id.raw(),
            category: listing.block.category(),
            geometry: listing.block.geometry.to_feature(),
            label: listing.block.label,
            timestamp: listing.block.created_at,
            distance_km: listing.mission.distance_km,
            duration_minutes: listing.mission.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDto {
    pub id: Id<Mission>,
    #[serde(flatten)]
    pub mission: Mission,
    pub block_count: i64,
}

impl From<MissionOverview> for MissionDto {
    fn from(overview: MissionOverview) -> Self {
        Self {
            id: overview.id,
            mission: overview.mission,
            block_count: overview.block_count,
        }
    }
}

fn owner_from_path(
    path: Result<Path<i64>, PathRejection>,
    original_uri: &OriginalUri,
) -> Result<Id<User>, RouteErrorResponse> {
    path.map(|Path(owner)| Id::new(owner)).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn get_blocks<D: Database>(
    original_uri: OriginalUri,
    path: Result<Path<i64>, PathRejection>,
    State(WebState { territory_client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<BlockDto>> {
    let owner = owner_from_path(path, &original_uri)?;
    territory_client
        .blocks(&owner)
        .await
        .map(|blocks| {
            blocks
                .into_iter()
                .map(BlockDto::from)
                .collect::<Vec<_>>()
                .let_owned(|data| owner_hateoas(VecResponse::new(data), &owner, base_url))
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_missions<D: Database>(
    original_uri: OriginalUri,
    path: Result<Path<i64>, PathRejection>,
    State(WebState { territory_client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<MissionDto>> {
    let owner = owner_from_path(path, &original_uri)?;
    territory_client
        .missions(&owner)
        .await
        .map(|missions| {
            missions
                .into_iter()
                .map(MissionDto::from)
                .collect::<Vec<_>>()
                .let_owned(|data| owner_hateoas(VecResponse::new(data), &owner, base_url))
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_summary<D: Database>(
    original_uri: OriginalUri,
    path: Result<Path<i64>, PathRejection>,
    State(WebState { territory_client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<MissionSummary> {
    let owner = owner_from_path(path, &original_uri)?;
    territory_client
        .summary(&owner)
        .await
        .map(|summary| owner_hateoas(summary, &owner, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn owner_hateoas<T>(
    content: T,
    owner: &Id<User>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<T> {
    hateoas::Response::builder(content, base_url)
        .link("blocks", resource!("/{}/blocks", owner.raw()))
        .link("missions", resource!("/{}/missions", owner.raw()))
        .link("summary", resource!("/{}/summary", owner.raw()))
        .build()
}
