use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use campus::{
    AdminId, Campus, Level, RepositoryProvider, SortDirection, StudentId, StudentSortKey,
};

use crate::{
    error::{ApiError, Result},
    middleware::{AppState, require_auth},
    types::*,
};

pub fn create_router<R>(campus: Arc<Campus<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AppState { campus };

    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler));

    let protected_routes = Router::new()
        .route(
            "/students",
            post(create_student_handler).get(list_students_handler),
        )
        .route("/students/search", get(search_students_handler))
        .route("/students/filter", get(filter_students_handler))
        .route("/students/import", post(import_students_handler))
        .route("/students/export", get(export_students_handler))
        .route(
            "/students/{id}",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .route("/admins", post(create_admin_handler))
        .route(
            "/admins/{key}",
            get(get_admin_handler).delete(delete_admin_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state
        .campus
        .health_check()
        .await
        .map_err(|_| ApiError::InternalError)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// ---------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------

async fn register_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let (_, token) = state
        .campus
        .register(&payload.username, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        token: token.into_inner(),
    }))
}

async fn login_handler<R>(
    State(state): State<AppState<R>>,
    connection_info: ConnectionInfo,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let ip = connection_info.ip.unwrap_or_else(|| "unknown".to_string());

    let (_, token) = state
        .campus
        .login(&payload.username, &payload.password, &ip)
        .await?;

    Ok(Json(TokenResponse {
        token: token.into_inner(),
    }))
}

// ---------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------

async fn create_student_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let student = state
        .campus
        .create_student(
            &payload.username,
            payload.level.unwrap_or(Level::Freshman),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

async fn list_students_handler<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let sort = parse_sort(params.sort_by.as_deref(), params.sort_direction.as_deref())?;

    let page = state
        .campus
        .list_students(params.page, params.size, sort)
        .await?;

    Ok(Json(page))
}

async fn get_student_handler<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let student = state.campus.get_student(&StudentId::new(&id)).await?;
    Ok(Json(student))
}

async fn update_student_handler<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let student = state
        .campus
        .update_student(&StudentId::new(&id), payload)
        .await?;
    Ok(Json(student))
}

async fn delete_student_handler<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.campus.delete_student(&StudentId::new(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_students_handler<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let page = state
        .campus
        .search_students(&params.query, params.page, params.size)
        .await?;
    Ok(Json(page))
}

async fn filter_students_handler<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<FilterParams>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let page = state
        .campus
        .filter_students_by_level(params.level, params.page, params.size)
        .await?;
    Ok(Json(page))
}

async fn import_students_handler<R>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    // Accept text/csv (and octet-stream uploads); reject anything that
    // declares itself as something else
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        && !content_type.contains("csv")
        && !content_type.contains("octet-stream")
    {
        return Err(ApiError::BadRequest("Please upload a CSV file".to_string()));
    }

    let report = state.campus.import_students_csv(body.as_ref()).await?;

    Ok(Json(ImportResponse {
        imported: report.imported,
        skipped: report.skipped,
    }))
}

async fn export_students_handler<R>(
    State(state): State<AppState<R>>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let bytes = state.campus.export_students_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------

async fn create_admin_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let admin = state
        .campus
        .create_admin(&payload.username, &payload.password)
        .await?;

    Ok(Json(AdminResponse { admin }))
}

async fn get_admin_handler<R>(
    State(state): State<AppState<R>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let admin = state.campus.get_admin_by_username(&username).await?;
    Ok(Json(AdminResponse { admin }))
}

async fn delete_admin_handler<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state.campus.delete_admin(&AdminId::new(&id)).await?;
    Ok(Json(MessageResponse {
        message: "Admin deleted".to_string(),
    }))
}

// ---------------------------------------------------------------------

fn parse_sort(
    sort_by: Option<&str>,
    sort_direction: Option<&str>,
) -> Result<Option<(StudentSortKey, SortDirection)>> {
    let Some(sort_by) = sort_by.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let key = match sort_by.to_ascii_lowercase().as_str() {
        "username" => StudentSortKey::Username,
        "level" => StudentSortKey::Level,
        "created_at" => StudentSortKey::CreatedAt,
        other => {
            return Err(ApiError::BadRequest(format!(
                "Unknown sort field: {other}"
            )));
        }
    };

    let direction = match sort_direction.map(|d| d.to_ascii_uppercase()) {
        None => SortDirection::Asc,
        Some(d) if d == "ASC" => SortDirection::Asc,
        Some(d) if d == "DESC" => SortDirection::Desc,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown sort direction: {other}"
            )));
        }
    };

    Ok(Some((key, direction)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert!(parse_sort(None, None).unwrap().is_none());
        assert!(parse_sort(Some(""), None).unwrap().is_none());

        let (key, dir) = parse_sort(Some("username"), None).unwrap().unwrap();
        assert_eq!(key, StudentSortKey::Username);
        assert_eq!(dir, SortDirection::Asc);

        let (key, dir) = parse_sort(Some("Level"), Some("desc")).unwrap().unwrap();
        assert_eq!(key, StudentSortKey::Level);
        assert_eq!(dir, SortDirection::Desc);

        assert!(parse_sort(Some("nope"), None).is_err());
        assert!(parse_sort(Some("username"), Some("sideways")).is_err());
    }
}
