//! Route handlers.

use super::{
    AppState, Backend,
    dto::{CreateServerBody, MessageResponse, ServerView},
    error::ApiError,
};
use crate::container::domain::NormalizedContainer;
use crate::error::ErrorKind;
use crate::server_registry::services::RegisterServerRequest;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

/// `?server=` selector shared by container routes.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ServerQuery {
    server: Option<String>,
}

/// Query for the restart route.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RestartQuery {
    server: Option<String>,
    pull_latest: Option<String>,
}

impl RestartQuery {
    /// Only the literal `true` requests a pull; any other value means no pull.
    fn pull_latest(&self) -> bool {
        self.pull_latest.as_deref() == Some("true")
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub(super) async fn list_containers<B: Backend>(
    State(state): State<AppState<B>>,
    params: Result<Query<ServerQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<NormalizedContainer>>> {
    let Query(query) = params?;
    let containers = state.containers.list(query.server.as_deref()).await?;
    Ok(Json(containers))
}

pub(super) async fn get_container<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    params: Result<Query<ServerQuery>, QueryRejection>,
) -> ApiResult<Json<NormalizedContainer>> {
    let Query(query) = params?;
    let container = state.containers.get(&id, query.server.as_deref()).await?;
    Ok(Json(container))
}

pub(super) async fn start_container<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    params: Result<Query<ServerQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = params?;
    state.containers.start(&id, query.server.as_deref()).await?;
    Ok(Json(MessageResponse::new(format!(
        "Container {id} started successfully"
    ))))
}

pub(super) async fn stop_container<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    params: Result<Query<ServerQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = params?;
    state.containers.stop(&id, query.server.as_deref()).await?;
    Ok(Json(MessageResponse::new(format!(
        "Container {id} stopped successfully"
    ))))
}

pub(super) async fn restart_container<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    params: Result<Query<RestartQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = params?;
    state
        .containers
        .restart(&id, query.server.as_deref(), query.pull_latest())
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "Container {id} restarted successfully"
    ))))
}

pub(super) async fn list_servers<B: Backend>(
    State(state): State<AppState<B>>,
) -> ApiResult<Json<Vec<ServerView>>> {
    let servers = state.servers.list().await?;
    Ok(Json(servers.iter().map(ServerView::from).collect()))
}

pub(super) async fn get_server<B: Backend>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServerView>> {
    let server = state.servers.get_by_name(&name).await?.ok_or_else(|| {
        ApiError::new(ErrorKind::ServerNotFound, format!("server '{name}' not found"))
    })?;
    Ok(Json(ServerView::from(&server)))
}

pub(super) async fn create_server<B: Backend>(
    State(state): State<AppState<B>>,
    payload: Result<Json<CreateServerBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ServerView>)> {
    let Json(body) = payload?;
    let mut request = RegisterServerRequest::new(body.name, body.host).as_default(body.is_default);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }

    let server = state.servers.create(request).await?;
    Ok((StatusCode::CREATED, Json(ServerView::from(&server))))
}

pub(super) async fn delete_server<B: Backend>(
    State(state): State<AppState<B>>,
    Path(name): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.servers.delete(&name).await?;
    Ok(Json(MessageResponse::new(format!(
        "Server {name} deleted successfully"
    ))))
}
