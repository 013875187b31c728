use utoipa::OpenApi;

use crate::apis::invites_api;
use crate::apis::invites_api::schemas::InviteRequest;
use crate::apis::schemas::ErrorResponse;
use crate::cores::dispatcher::{InvitationLinks, LinkUrl};


#[derive(OpenApi)]
#[openapi(
    paths(
        invites_api::health,
        invites_api::create_invite,
    ),
    components(
        schemas(InviteRequest, InvitationLinks, LinkUrl, ErrorResponse)
    )
)]

pub struct ApiDoc;
