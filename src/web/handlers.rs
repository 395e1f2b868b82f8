use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};

use crate::error::ChatError;
use crate::web::models::ChatRequest;
use crate::AppState;

pub const LIVENESS_TEXT: &str = "AlphaSoil Backend is running 🚀";

type ChatBody = Result<web::Either<web::Json<ChatRequest>, web::Form<ChatRequest>>, actix_web::Error>;

// Liveness; never touches the upstream API
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_TEXT)
}

// Chat API endpoint, accepts JSON or form bodies
pub async fn chat(data: web::Data<AppState>, body: ChatBody) -> Result<HttpResponse, ChatError> {
    let message = match body {
        Ok(web::Either::Left(json)) => json.into_inner().message,
        Ok(web::Either::Right(form)) => form.into_inner().message,
        Err(e) => {
            // An unreadable body is handled like a missing message.
            debug!("Could not read chat body: {}", e);
            None
        }
    }
    .unwrap_or_default();

    info!("Chat request: {} characters", message.len());

    match data.relay.handle(&message).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(reply)),
        Err(ChatError::Internal(e)) => {
            error!("Error in /chat: {:#}", e);
            Err(ChatError::Internal(e))
        }
        Err(e) => Err(e),
    }
}
