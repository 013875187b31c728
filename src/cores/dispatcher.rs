use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::cores::errors::InviteError;
use crate::cores::invitations::{InvitePlan, LinkKind, UpstreamCall};
use crate::cores::token::AccessToken;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LinkUrl {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct InvitationLinks {
    #[serde(rename = "serviceReviewInvitationLink", skip_serializing_if = "Option::is_none")]
    pub service_review_invitation_link: Option<String>,
    #[serde(rename = "productReviewInvitationLinks", skip_serializing_if = "Option::is_none")]
    pub product_review_invitation_links: Option<Vec<LinkUrl>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum InviteResult {
    // Upstream acknowledgement, relayed as is
    Email(Value),
    Links(InvitationLinks),
}

pub struct InviteDispatcher {
    client: Client,
}

impl InviteDispatcher {
    pub fn new(client: Client) -> Self {
        InviteDispatcher { client }
    }

    /// Issue every call of the plan in order.
    ///
    /// The first failure aborts the rest. Links already generated upstream by
    /// earlier calls are neither rolled back nor reported.
    pub async fn dispatch(&self, plan: &InvitePlan, token: &AccessToken) -> Result<InviteResult, InviteError> {
        match plan {
            InvitePlan::Email(call) => {
                let body = self.send(call, token).await?;
                info!("Email invitation scheduled for {}", call.url);
                Ok(InviteResult::Email(email_acknowledgement(&body)))
            }
            InvitePlan::Links(calls) => {
                let mut links = InvitationLinks::default();
                for link in calls {
                    let body = self.send(&link.call, token).await?;
                    let url = link_url(&body)?;
                    match link.kind {
                        LinkKind::Service => links.service_review_invitation_link = Some(url),
                        LinkKind::Product => links.product_review_invitation_links = Some(vec![LinkUrl { url }]),
                    }
                }
                Ok(InviteResult::Links(links))
            }
        }
    }

    // Returns the raw response body of a successful call
    async fn send(&self, call: &UpstreamCall, token: &AccessToken) -> Result<String, InviteError> {
        debug!("POST {}", call.url);
        let mut request = self.client.post(&call.url)
            .bearer_auth(token.as_str())
            .json(&call.body);
        for (name, value) in &call.headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InviteError::upstream(status.as_u16(), body));
        }
        Ok(body)
    }
}

// Empty bodies get a fixed acknowledgement, non-JSON text is wrapped under `message`
fn email_acknowledgement(body: &str) -> Value {
    if body.trim().is_empty() {
        return json!({ "message": "Invitation created successfully." });
    }
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "message": body }))
}

fn link_url(body: &str) -> Result<String, InviteError> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("url").and_then(Value::as_str).map(str::to_string))
        .ok_or_else(|| InviteError::Upstream {
            status: 200,
            body: format!("Link response did not contain a url: {}", body),
        })
}
