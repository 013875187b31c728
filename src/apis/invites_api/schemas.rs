use serde::{Deserialize, Serialize};
use utoipa::ToSchema;


// Define the request struct, corresponding to the request parameters of the /api/create-invite interface.
// Every field is optional on the wire: inviteType and reviewType are checked by us so an unknown
// or missing value gets its own 400, and absent customer fields are simply not forwarded.
#[derive(Deserialize, Serialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct InviteRequest {
    #[schema(example = "email")]
    pub invite_type: String,             // "email" or "link"
    #[schema(example = "combined")]
    pub review_type: String,             // "service", "product" or "combined"
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub reference_id: Option<String>,
    pub product_name: Option<String>,    // Only used when reviewType involves a product.
    pub product_sku: Option<String>,
    pub product_url: Option<String>,
}
