pub mod api_doc;
pub mod invites_api;
pub mod schemas;
