pub mod app_state;
pub mod dispatcher;
pub mod errors;
pub mod invitations;
pub mod token;
