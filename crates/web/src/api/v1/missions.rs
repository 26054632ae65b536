use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Extension, Json, Router,
};
use model::submission::{IngestReceipt, MissionSubmission};
use territory::database::Database;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/schema", get(schema::<MissionSubmission>))
        .route("/", post(ingest_mission::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ingest_mission<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { territory_client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    payload: Result<Json<MissionSubmission>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<IngestReceipt>>)> {
    let Json(submission) = payload.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;
    let owner = submission.owner_user_id;

    let receipt = territory_client.ingest(submission).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    // a successful ingestion always had an owner
    let response = match owner {
        Some(owner) => hateoas::Response::builder(receipt, base_url)
            .link("blocks", super::users::resource!("/{}/blocks", owner))
            .link("missions", super::users::resource!("/{}/missions", owner))
            .build(),
        None => hateoas::Response::new(receipt),
    };

    Ok((StatusCode::CREATED, response.json()))
}
