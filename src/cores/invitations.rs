use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::apis::invites_api::schemas::InviteRequest;
use crate::configs::settings::{Credentials, Sender, Trustpilot};
use crate::cores::errors::InviteError;

pub const INVITE_LOCALE: &str = "en-US";
pub const BUSINESS_USER_HEADER: &str = "x-business-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteType {
    Email,
    Link,
}

impl TryFrom<&str> for InviteType {
    type Error = InviteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "email" => Ok(InviteType::Email),
            "link" => Ok(InviteType::Link),
            _ => Err(InviteError::Validation("Invalid inviteType specified.".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewType {
    Service,
    Product,
    Combined,
}

impl ReviewType {
    pub fn includes_service(self) -> bool {
        matches!(self, ReviewType::Service | ReviewType::Combined)
    }

    pub fn includes_product(self) -> bool {
        matches!(self, ReviewType::Product | ReviewType::Combined)
    }
}

impl TryFrom<&str> for ReviewType {
    type Error = InviteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "service" => Ok(ReviewType::Service),
            "product" => Ok(ReviewType::Product),
            "combined" => Ok(ReviewType::Combined),
            _ => Err(InviteError::Validation("Invalid reviewType specified.".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(rename = "productUrl", skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

/// A form submission whose flags have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Invite {
    pub invite_type: InviteType,
    pub review_type: ReviewType,
    pub email: Option<String>,
    pub name: Option<String>,
    pub reference_id: Option<String>,
    pub product: Product,
}

impl TryFrom<InviteRequest> for Invite {
    type Error = InviteError;

    // inviteType is checked first so its message wins when both flags are bad
    fn try_from(req: InviteRequest) -> Result<Self, Self::Error> {
        let invite_type = InviteType::try_from(req.invite_type.as_str())?;
        let review_type = ReviewType::try_from(req.review_type.as_str())?;

        Ok(Invite {
            invite_type,
            review_type,
            email: req.customer_email,
            name: req.customer_name,
            reference_id: req.reference_id,
            product: Product {
                name: req.product_name,
                sku: req.product_sku,
                product_url: req.product_url,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Service,
    Product,
}

/// One POST to the Trustpilot API, minus the bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCall {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkCall {
    pub kind: LinkKind,
    pub call: UpstreamCall,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvitePlan {
    Email(UpstreamCall),
    // Issued in order: service link first, then product link
    Links(Vec<LinkCall>),
}

impl InvitePlan {
    pub fn call_count(&self) -> usize {
        match self {
            InvitePlan::Email(_) => 1,
            InvitePlan::Links(calls) => calls.len(),
        }
    }
}

pub struct InviteBuilder<'a> {
    endpoints: &'a Trustpilot,
    sender: &'a Sender,
    credentials: &'a Credentials,
}

impl<'a> InviteBuilder<'a> {
    pub fn new(endpoints: &'a Trustpilot, sender: &'a Sender, credentials: &'a Credentials) -> Self {
        InviteBuilder { endpoints, sender, credentials }
    }

    pub fn build(&self, invite: &Invite) -> Result<InvitePlan, InviteError> {
        match invite.invite_type {
            InviteType::Email => Ok(InvitePlan::Email(self.email_invitation(invite))),
            InviteType::Link => {
                let mut calls = Vec::with_capacity(2);
                if invite.review_type.includes_service() {
                    calls.push(LinkCall { kind: LinkKind::Service, call: self.service_link(invite) });
                }
                if invite.review_type.includes_product() {
                    calls.push(LinkCall { kind: LinkKind::Product, call: self.product_link(invite)? });
                }
                Ok(InvitePlan::Links(calls))
            }
        }
    }

    fn email_invitation(&self, invite: &Invite) -> UpstreamCall {
        let mut body = customer_fields(invite);
        body.insert("locale".to_string(), json!(INVITE_LOCALE));
        body.insert("senderEmail".to_string(), json!(self.sender.sender_email));
        body.insert("senderName".to_string(), json!(self.sender.sender_name));
        body.insert("replyTo".to_string(), json!(self.sender.reply_to));

        if invite.review_type.includes_service() {
            body.insert("serviceReviewInvitation".to_string(), json!({}));
        }
        if invite.review_type.includes_product() {
            body.insert("productReviewInvitation".to_string(), json!({
                "products": [invite.product],
            }));
        }

        UpstreamCall {
            url: format!("{}/{}/email-invitations", self.endpoints.invitations_api, self.credentials.business_unit_id),
            headers: Vec::new(),
            body: Value::Object(body),
        }
    }

    fn service_link(&self, invite: &Invite) -> UpstreamCall {
        UpstreamCall {
            url: format!("{}/{}/invitation-links", self.endpoints.invitations_api, self.credentials.business_unit_id),
            headers: Vec::new(),
            body: Value::Object(customer_fields(invite)),
        }
    }

    fn product_link(&self, invite: &Invite) -> Result<UpstreamCall, InviteError> {
        let business_user_id = self.credentials.business_user_id.clone().ok_or_else(|| {
            InviteError::Config("TRUSTPILOT_BUSINESS_USER_ID is required for product review links".to_string())
        })?;

        let mut body = customer_fields(invite);
        body.insert("products".to_string(), json!([invite.product]));

        Ok(UpstreamCall {
            url: format!("{}/{}/invitation-links", self.endpoints.product_reviews_api, self.credentials.business_unit_id),
            headers: vec![(BUSINESS_USER_HEADER, business_user_id)],
            body: Value::Object(body),
        })
    }
}

// referenceId, name and email, leaving out whatever the form did not send
fn customer_fields(invite: &Invite) -> Map<String, Value> {
    let mut fields = Map::new();
    for (key, value) in [
        ("referenceId", &invite.reference_id),
        ("name", &invite.name),
        ("email", &invite.email),
    ] {
        if let Some(value) = value {
            fields.insert(key.to_string(), json!(value));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(invite_type: &str, review_type: &str) -> InviteRequest {
        InviteRequest {
            invite_type: invite_type.to_string(),
            review_type: review_type.to_string(),
            customer_email: Some("jane@example.com".to_string()),
            customer_name: Some("Jane Doe".to_string()),
            reference_id: Some("order-42".to_string()),
            product_name: Some("Blue Mug".to_string()),
            product_sku: Some("MUG-BLUE".to_string()),
            product_url: Some("https://shop.example.com/mug".to_string()),
        }
    }

    fn credentials(business_user_id: Option<&str>) -> Credentials {
        Credentials {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            business_unit_id: "bu-1".to_string(),
            business_user_id: business_user_id.map(str::to_string),
        }
    }

    fn build(req: InviteRequest, business_user_id: Option<&str>) -> Result<InvitePlan, InviteError> {
        let endpoints = Trustpilot::default();
        let sender = Sender::default();
        let credentials = credentials(business_user_id);
        let invite = Invite::try_from(req)?;
        InviteBuilder::new(&endpoints, &sender, &credentials).build(&invite)
    }

    fn email_call(req: InviteRequest) -> UpstreamCall {
        match build(req, Some("user-9")).unwrap() {
            InvitePlan::Email(call) => call,
            other => panic!("expected email plan, got {:?}", other),
        }
    }

    fn link_calls(req: InviteRequest) -> Vec<LinkCall> {
        match build(req, Some("user-9")).unwrap() {
            InvitePlan::Links(calls) => calls,
            other => panic!("expected link plan, got {:?}", other),
        }
    }

    #[test]
    fn unknown_invite_type_is_rejected() {
        let err = Invite::try_from(request("sms", "service")).unwrap_err();
        match err {
            InviteError::Validation(message) => assert_eq!(message, "Invalid inviteType specified."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn invite_type_error_wins_over_review_type() {
        let err = Invite::try_from(request("sms", "bogus")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid inviteType specified.");

        let err = Invite::try_from(request("email", "bogus")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid reviewType specified.");
    }

    #[test]
    fn flags_are_checked_without_customer_fields() {
        let req = InviteRequest {
            invite_type: "sms".to_string(),
            review_type: "service".to_string(),
            ..Default::default()
        };
        assert_eq!(Invite::try_from(req).unwrap_err().to_string(), "Invalid inviteType specified.");
    }

    #[test]
    fn email_service_has_fixed_fields_and_empty_service_object() {
        let call = email_call(request("email", "service"));

        assert_eq!(call.url, "https://invitations-api.trustpilot.com/v1/private/business-units/bu-1/email-invitations");
        assert_eq!(call.body, json!({
            "referenceId": "order-42",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "locale": "en-US",
            "senderEmail": "someemail2@trustpilot.com",
            "senderName": "John Doe",
            "replyTo": "kej@trustpilot.com",
            "serviceReviewInvitation": {},
        }));
    }

    #[test]
    fn email_combined_carries_both_sub_objects() {
        let call = email_call(request("email", "combined"));

        assert_eq!(call.body["serviceReviewInvitation"], json!({}));
        assert_eq!(call.body["productReviewInvitation"], json!({
            "products": [{
                "name": "Blue Mug",
                "sku": "MUG-BLUE",
                "productUrl": "https://shop.example.com/mug",
            }],
        }));
    }

    #[test]
    fn email_product_has_no_service_object() {
        let call = email_call(request("email", "product"));
        assert!(call.body.get("serviceReviewInvitation").is_none());
        assert!(call.body.get("productReviewInvitation").is_some());
    }

    #[test]
    fn absent_customer_fields_are_not_forwarded() {
        let mut req = request("email", "service");
        req.customer_name = None;
        req.reference_id = None;

        let call = email_call(req);
        assert!(call.body.get("name").is_none());
        assert!(call.body.get("referenceId").is_none());
        assert_eq!(call.body["email"], "jane@example.com");
        assert_eq!(call.body["locale"], "en-US");
    }

    #[test]
    fn link_service_is_a_single_call() {
        let calls = link_calls(request("link", "service"));
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, LinkKind::Service);
        assert!(calls[0].call.headers.is_empty());
        assert_eq!(calls[0].call.body, json!({
            "email": "jane@example.com",
            "name": "Jane Doe",
            "referenceId": "order-42",
        }));
    }

    #[test]
    fn link_combined_orders_service_before_product() {
        let calls = link_calls(request("link", "combined"));
        let kinds: Vec<LinkKind> = calls.iter().map(|link| link.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Service, LinkKind::Product]);

        let product = &calls[1].call;
        assert_eq!(
            product.url,
            "https://api.trustpilot.com/v1/private/product-reviews/business-units/bu-1/invitation-links"
        );
        assert_eq!(product.headers, vec![(BUSINESS_USER_HEADER, "user-9".to_string())]);
        assert_eq!(product.body["products"][0]["sku"], "MUG-BLUE");
    }

    #[test]
    fn product_link_without_business_user_is_config_error() {
        let err = build(request("link", "product"), None).unwrap_err();
        assert!(matches!(err, InviteError::Config(_)));
    }

    #[test]
    fn missing_product_fields_are_omitted() {
        let mut req = request("email", "product");
        req.product_sku = None;
        req.product_url = None;

        let call = email_call(req);
        assert_eq!(call.body["productReviewInvitation"]["products"][0], json!({"name": "Blue Mug"}));
    }
}
