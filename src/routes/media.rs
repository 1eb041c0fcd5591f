use crate::{
    error::{AppError, Result},
    models::media::{MediaUpload, MediaUploadResponse},
    state::AppState,
    utils::middleware::AuthUser,
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 上传媒体
/// POST /media (multipart: type, post_id, file)
pub async fn upload_media(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MediaUploadResponse>)> {
    debug!("Processing media upload for user: {}", user.id);

    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected media upload body: {}", rejection);
        AppError::bad_request("Invalid form data")
    })?;

    let mut upload = MediaUpload::default();

    // 处理multipart表单数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to process multipart field: {}", e);
        AppError::bad_request("Invalid form data")
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "type" => upload.media_type = Some(read_text(field).await?),
            "post_id" => upload.post_id = Some(read_text(field).await?),
            "file" => {
                upload.filename = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    error!("Failed to read file data: {}", e);
                    AppError::bad_request("Invalid form data")
                })?;
                upload.data = Some(data.to_vec());
            }
            other => debug!("Ignoring multipart field: {}", other),
        }
    }

    let media = app_state.media_service.upload(user.id, upload).await?;

    info!("Media {} uploaded by user {}", media.media_id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MediaUploadResponse {
            media_id: media.media_id,
            message: "Media uploaded".to_string(),
        }),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field.text().await.map_err(|e| {
        error!("Failed to read form field: {}", e);
        AppError::bad_request("Invalid form data")
    })
}
