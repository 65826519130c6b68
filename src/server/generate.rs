use crate::{
    error::ImageGenError,
    models::{GenerationRequest, GenerationResponse, MessageBody},
    server::AppState,
};
use actix_web::{web, HttpResponse};

pub async fn generate(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ImageGenError> {
    let request: GenerationRequest = serde_json::from_slice(&body).map_err(|e| {
        log::debug!("Malformed generation body: {}", e);
        ImageGenError::InvalidInput("Invalid request body".into())
    })?;

    let image_url = state.service.generate(&request).await?;
    log::info!("Image generated: {}", image_url);

    Ok(HttpResponse::Ok().json(GenerationResponse::ok(image_url)))
}

pub async fn describe() -> HttpResponse {
    HttpResponse::Ok().json(MessageBody {
        message: "Image generation API endpoint. Use POST method.".to_string(),
    })
}
