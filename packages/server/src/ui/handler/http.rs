//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    domain::{CollectionPath, RecordFields, RecordId},
    infrastructure::dto::http::{
        CreateRecordRequestDto, CreateRecordResponseDto, CustomTokenRequestDto, RecordDto,
        SessionDto, SignInResponseDto,
    },
    ui::state::AppState,
    usecase::{
        AppendRecordUseCase, GetRecordUseCase, ListRecordsUseCase, RemoveRecordUseCase,
        SignInMethod, SignInUseCase,
    },
};

use super::{
    ApiError,
    auth::{authenticate, bearer_token},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create an anonymous user and open a session
pub async fn sign_in_anonymous(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SignInResponseDto>), ApiError> {
    let usecase = SignInUseCase::new(state.identity.clone());
    let credential = usecase.execute(SignInMethod::Anonymous).await?;
    Ok((StatusCode::CREATED, Json(credential.into())))
}

/// Redeem a one-time custom token
pub async fn sign_in_custom_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomTokenRequestDto>,
) -> Result<(StatusCode, Json<SignInResponseDto>), ApiError> {
    let usecase = SignInUseCase::new(state.identity.clone());
    let credential = usecase
        .execute(SignInMethod::CustomToken(request.token))
        .await?;
    Ok((StatusCode::CREATED, Json(credential.into())))
}

/// Who the bearer token belongs to
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionDto>, ApiError> {
    let user_id = authenticate(&state, bearer_token(&headers)).await?;
    Ok(Json(SessionDto {
        uid: user_id.into_string(),
    }))
}

/// Append a record; the author is always the authenticated caller
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Path((app_id, collection)): Path<(String, String)>,
    headers: HeaderMap,
    Json(request): Json<CreateRecordRequestDto>,
) -> Result<(StatusCode, Json<CreateRecordResponseDto>), ApiError> {
    let author = authenticate(&state, bearer_token(&headers)).await?;
    let path = CollectionPath::from_segments(&app_id, &collection)?;
    let fields = RecordFields::from_value(request.fields)?;

    let usecase = AppendRecordUseCase::new(state.documents.clone());
    let record = usecase.execute(path, author, fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecordResponseDto {
            id: record.id.as_str().to_string(),
        }),
    ))
}

/// Current contents of a collection
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path((app_id, collection)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Vec<RecordDto>>, ApiError> {
    authenticate(&state, bearer_token(&headers)).await?;
    let path = CollectionPath::from_segments(&app_id, &collection)?;

    let usecase = ListRecordsUseCase::new(state.documents.clone());
    let records = usecase.execute(&path).await?;

    Ok(Json(records.iter().map(RecordDto::from).collect()))
}

/// A single record
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path((app_id, collection, record_id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<RecordDto>, ApiError> {
    authenticate(&state, bearer_token(&headers)).await?;
    let path = CollectionPath::from_segments(&app_id, &collection)?;
    let id = RecordId::new(record_id)?;

    let usecase = GetRecordUseCase::new(state.documents.clone());
    let record = usecase.execute(&path, &id).await?;

    Ok(Json(RecordDto::from(&record)))
}

/// Delete a record owned by the caller
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path((app_id, collection, record_id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = authenticate(&state, bearer_token(&headers)).await?;
    let path = CollectionPath::from_segments(&app_id, &collection)?;
    let id = RecordId::new(record_id)?;

    let usecase = RemoveRecordUseCase::new(state.documents.clone());
    usecase.execute(&path, &id, &caller).await?;

    Ok(StatusCode::NO_CONTENT)
}
