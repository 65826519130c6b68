use crate::{
    error::ImageGenError,
    models::{DownloadRequest, MessageBody},
    server::{error::DownloadFailure, AppState},
};
use actix_web::{
    http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH},
    web, HttpResponse,
};

pub async fn download(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, DownloadFailure> {
    let request: DownloadRequest = serde_json::from_slice(&body).map_err(|e| {
        log::debug!("Malformed download body: {}", e);
        ImageGenError::InvalidInput("Invalid request body".into())
    })?;

    let download = state.service.download(&request).await?;
    log::info!(
        "Serving {} ({} bytes, {})",
        download.filename,
        download.bytes.len(),
        download.content_type
    );

    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", download.filename))
            .map_err(|e| ImageGenError::Internal(format!("Invalid attachment header: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type(download.content_type)
        .insert_header((CONTENT_DISPOSITION, disposition))
        .insert_header((CONTENT_LENGTH, download.bytes.len()))
        .body(download.bytes))
}

pub async fn describe() -> HttpResponse {
    HttpResponse::Ok().json(MessageBody {
        message: "Image download API endpoint. Use POST method with imageUrl and filename."
            .to_string(),
    })
}
