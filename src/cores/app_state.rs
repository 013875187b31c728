use reqwest::Client;

use crate::configs::settings::{Config, Credentials};
use crate::cores::dispatcher::InviteDispatcher;
use crate::cores::invitations::InviteBuilder;
use crate::cores::token::TokenProvider;

// Shared, read-only state handed to every request
pub struct AppState {
    pub config: Config,
    pub credentials: Credentials,
    pub token_provider: TokenProvider,
    pub dispatcher: InviteDispatcher,
}

impl AppState {
    pub fn new(config: Config, credentials: Credentials) -> Self {
        // One connection pool for the token endpoint and the invitation endpoints
        let client = Client::new();
        let token_provider = TokenProvider::new(client.clone(), config.trustpilot.token_url.clone(), credentials.clone());
        let dispatcher = InviteDispatcher::new(client);

        AppState { config, credentials, token_provider, dispatcher }
    }

    pub fn builder(&self) -> InviteBuilder<'_> {
        InviteBuilder::new(&self.config.trustpilot, &self.config.sender, &self.credentials)
    }
}
