use std::{borrow::Cow, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::any,
};
use http_body_util::LengthLimitError;
use tracing::{debug, info, warn};

use crate::{
    AppState,
    error::{ApiError, AppResult},
    models::MovieRequest,
    response::{JSON_CONTENT_TYPE, json_response},
    validation,
};

const MOVIES_PREFIX: &str = "/movies/";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies", any(collection))
        .route("/movies/", any(item))
        .route("/movies/{*rest}", any(item))
        .with_state(state)
}

async fn collection(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Response> {
    dispatch(&state, &method, None, query.as_deref(), &headers, body).await
}

async fn item(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Response> {
    let id = id_segment(uri.path());
    dispatch(&state, &method, id.as_deref(), query.as_deref(), &headers, body).await
}

/// First path segment after `/movies/`, percent-decoded. Later segments are
/// ignored and an empty segment means no id. A segment that does not decode
/// is passed on raw and fails id parsing.
fn id_segment(path: &str) -> Option<String> {
    let segment = path.strip_prefix(MOVIES_PREFIX)?.split('/').next()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    Some(decoded.into_owned())
}

/// A `year=` query filters regardless of method or id; everything else is
/// routed by method.
async fn dispatch(
    state: &AppState,
    method: &Method,
    id: Option<&str>,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Body,
) -> AppResult<Response> {
    let result = if let Some(raw_year) = query.and_then(|q| q.strip_prefix("year=")) {
        filter_by_year(state, raw_year)
    } else {
        match *method {
            Method::GET => match id {
                Some(id) => get_by_id(state, id),
                None => Ok(list(state)),
            },
            Method::POST => create(state, headers, body).await,
            Method::DELETE => delete_by_id(state, id),
            _ => Err(ApiError::MethodNotAllowed),
        }
    };

    result.inspect_err(|err| {
        warn!(%method, id, status = %err.status(), error = %err, "request rejected");
    })
}

fn list(state: &AppState) -> Response {
    let movies = state.store.get_all();
    debug!(count = movies.len(), "listing movies");
    json_response(StatusCode::OK, &movies)
}

fn filter_by_year(state: &AppState, raw_year: &str) -> AppResult<Response> {
    let year: i32 = urlencoding::decode(raw_year)
        .ok()
        .and_then(|year| year.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("year must be a number".to_string()))?;

    let movies = state.store.get_by_year(year);
    debug!(year, count = movies.len(), "filtering movies by year");
    Ok(json_response(StatusCode::OK, &movies))
}

fn get_by_id(state: &AppState, raw_id: &str) -> AppResult<Response> {
    let id = parse_id(Some(raw_id))?;
    let movie = state.store.get_by_id(id).ok_or_else(not_found)?;
    debug!(id, "fetched movie");
    Ok(json_response(StatusCode::OK, &movie))
}

async fn create(state: &AppState, headers: &HeaderMap, body: Body) -> AppResult<Response> {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if content_type != Some(JSON_CONTENT_TYPE) {
        return Err(ApiError::UnsupportedMediaType);
    }

    // Buffered only once the content type is known to be acceptable.
    let body = axum::body::to_bytes(body, state.config.max_body_bytes).await.map_err(|err| {
        if err.into_inner().is::<LengthLimitError>() {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest("request body could not be read".to_string())
        }
    })?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("request body must not be empty".to_string()));
    }

    let req: MovieRequest = serde_json::from_slice(&body).map_err(|err| {
        debug!(error = %err, "could not parse movie request");
        ApiError::BadRequest("malformed JSON".to_string())
    })?;

    let errors = validation::validate(&req, validation::current_year());
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let movie = state.store.add(req.title.as_deref().unwrap_or_default(), req.year);
    info!(id = movie.id, title = %movie.title, year = movie.year, "movie created");
    Ok(json_response(StatusCode::CREATED, &movie))
}

fn delete_by_id(state: &AppState, raw_id: Option<&str>) -> AppResult<Response> {
    let id = parse_id(raw_id)?;
    let movie = state.store.delete_by_id(id).ok_or_else(not_found)?;
    info!(id = movie.id, "movie deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn parse_id(raw: Option<&str>) -> AppResult<i64> {
    raw.and_then(|id| id.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("movie id must be a number".to_string()))
}

fn not_found() -> ApiError {
    ApiError::NotFound("movie not found".to_string())
}
