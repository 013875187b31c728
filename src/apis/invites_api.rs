use actix_web::error::InternalError;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::{debug, error, info};

pub mod schemas;

use crate::apis::invites_api::schemas::InviteRequest;
use crate::apis::schemas::ErrorResponse;
use crate::cores::app_state::AppState;
use crate::cores::dispatcher::{InvitationLinks, InviteResult};
use crate::cores::errors::InviteError;
use crate::cores::invitations::Invite;
use crate::utils::log::log_request;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
       .service(health)
       .service(create_invite);
}

// Malformed bodies get the same {message, error} shape as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        let detail = err.to_string();
        error!(target: "error_log", "{}", log_request(req, 400, Some(&detail)));

        let body = ErrorResponse {
            message: "Invalid request body.".to_string(),
            error: Some(detail),
        };
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, body = String),
    )
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    "OK"
}

#[utoipa::path(
    post,
    path = "/api/create-invite",
    request_body = InviteRequest,
    responses(
        (status = 200, body = InvitationLinks, description = "Generated links, or the email invitation acknowledgement"),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[post("/api/create-invite")]
pub async fn create_invite(
    req: HttpRequest,
    state: web::Data<AppState>,
    req_body: web::Json<InviteRequest>,
) -> Result<HttpResponse, InviteError> {
    debug!("Received invite request: {:?}", req_body);

    match process_invite(&state, req_body.into_inner()).await {
        Ok(result) => {
            info!(target: "access_log", "{}", log_request(&req, 200, None));
            Ok(HttpResponse::Ok().json(result))
        }
        Err(err) => {
            error!(target: "error_log", "{}", log_request(&req, err.status_code().as_u16(), Some(&err.to_string())));
            Err(err)
        }
    }
}

// validate -> authenticate -> build -> dispatch, each step runs only if the previous one succeeded
async fn process_invite(state: &AppState, req_body: InviteRequest) -> Result<InviteResult, InviteError> {
    // 1. Check the flags before touching the network
    let invite = Invite::try_from(req_body)?;

    // 2. Fresh token for every request
    let token = state.token_provider.get_access_token().await?;

    // 3. Build the upstream call(s)
    let plan = state.builder().build(&invite)?;
    debug!("Dispatching {} upstream call(s)", plan.call_count());

    // 4. Send them in order
    state.dispatcher.dispatch(&plan, &token).await
}
