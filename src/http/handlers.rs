use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::app::media::MediaService;
use crate::app::upload::{FormField, UploadError, UploadForm, UploadPipeline};
use crate::app::wallpaper::Wallpaper;
use crate::http::auth::{authorization, AdminAuth, GatedAuth, Unauthorized};
use crate::http::{pages, AppError};
use crate::AppState;

const INTERNAL_ERROR: &str = "internal server error";
const CONTENT_REJECTED: &str = "upload rejected: content does not meet requirements";

#[derive(Serialize)]
pub struct UploadResponse {
    pub data: String,
}

#[derive(Serialize)]
pub struct WallpaperResponse {
    pub status: bool,
    pub message: &'static str,
    pub data: Vec<Wallpaper>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub deleted: u64,
}

pub async fn landing(_auth: GatedAuth) -> Html<&'static str> {
    Html(pages::landing())
}

pub async fn gallery(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let records = state.records.list_all().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list media records");
        AppError::internal(INTERNAL_ERROR)
    })?;

    Ok(Html(pages::gallery(&records)))
}

pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => match read_form(multipart).await {
            Ok(form) => form,
            Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return AppError::payload_too_large("upload exceeds max size").into_response();
            }
            Err(err) => {
                tracing::warn!(error = %err, "unreadable multipart body");
                UploadForm::default()
            }
        },
        Err(rejection) => {
            tracing::debug!(error = %rejection, "upload is not a multipart body");
            UploadForm::default()
        }
    };

    let pipeline = UploadPipeline::new(
        state.forwarder.clone(),
        state.moderation.clone(),
        state.records.clone(),
        state.credentials.clone(),
        state.enable_auth,
        state.domain.clone(),
    );

    match pipeline.run(&form, authorization(&headers)).await {
        Ok(record) => Json(UploadResponse { data: record.url }).into_response(),
        Err(err) => upload_error_response(err),
    }
}

fn upload_error_response(err: UploadError) -> Response {
    match err {
        UploadError::MissingFile => AppError::bad_request("missing file").into_response(),
        UploadError::Unauthorized => Unauthorized.into_response(),
        UploadError::ContentRejected { .. } => AppError::bad_request(CONTENT_REJECTED).into_response(),
        UploadError::Upstream(err) => {
            tracing::error!(error = ?err, "upstream failure during upload");
            AppError::internal(INTERNAL_ERROR).into_response()
        }
        UploadError::Store(err) => {
            tracing::error!(error = ?err, "failed to store media record");
            AppError::internal(INTERNAL_ERROR).into_response()
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, MultipartError> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(UploadForm::new(fields))
}

pub async fn wallpapers(State(state): State<AppState>) -> Result<Json<WallpaperResponse>, AppError> {
    let data = state.wallpapers.latest().await.map_err(|err| {
        tracing::error!(error = ?err, "failed to fetch wallpapers");
        AppError::internal(INTERNAL_ERROR)
    })?;

    Ok(Json(WallpaperResponse {
        status: true,
        message: "ok",
        data,
    }))
}

pub async fn delete_images(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeleteResponse>, AppError> {
    let keys: Vec<String> = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("expected a JSON array of keys"))?;
    if keys.is_empty() {
        return Err(AppError::bad_request("no items to delete"));
    }

    let deleted = state.records.delete_many(&keys).await.map_err(|err| {
        tracing::error!(error = ?err, count = keys.len(), "failed to delete media records");
        AppError::internal("delete failed")
    })?;
    tracing::info!(requested = keys.len(), deleted, "media records deleted");

    Ok(Json(DeleteResponse {
        message: "deleted",
        deleted,
    }))
}

/// Catch-all: the request path is a media key.
pub async fn serve_media(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return method_not_allowed().await.into_response();
    }

    let key = uri.path();
    let service = MediaService::new(
        state.records.clone(),
        state.origin.clone(),
        state.provider_origin_host.clone(),
    );

    match service.serve(key).await {
        Ok(Some(media)) => {
            let mut response = Response::new(Body::from_stream(media.body));
            *response.status_mut() = media.status;
            *response.headers_mut() = media.headers;
            response
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            tracing::error!(error = ?err, key = %key, "failed to serve media");
            AppError::internal(INTERNAL_ERROR).into_response()
        }
    }
}

pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
