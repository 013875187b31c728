use actix_web::{web, App, HttpServer};
use actix_cors::Cors;
use std::{fs::File, io::BufReader};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use log4rs::init_file;
use log::{error, info};

mod apis;
mod cores;
mod configs;
mod utils;

use crate::configs::settings::{Config, Credentials, GLOBAL_CONFIG};
use crate::cores::app_state::AppState;
use crate::apis::api_doc::ApiDoc;


#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = &*GLOBAL_CONFIG;

    init_file(&config.log_config, Default::default())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Logger setup failed: {}", e)))?;

    // Credentials are checked once here rather than on the first request
    let credentials = Credentials::from_env().map_err(|e| {
        error!(target: "error_log", "{}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    info!("Loaded credentials for business unit {}", credentials.business_unit_id);

    let state = web::Data::new(AppState::new(config.clone(), credentials));

    // Set the port number
    let port = config.port;
    info!("Starting server on port {}", port);

    // Start the HTTP server
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin() // cors
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["Content-Type"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(apis::invites_api::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    });

    if config.tls.enabled {
        server.bind_rustls_0_23(("0.0.0.0", port), load_tls_config(config)?)?.run().await
    } else {
        server.bind(("0.0.0.0", port))?.run().await
    }
}

// Https set
fn load_tls_config(config: &Config) -> std::io::Result<rustls::ServerConfig> {
    let mut certs_file = BufReader::new(File::open(&config.tls.cert_file)?);
    let mut key_file = BufReader::new(File::open(&config.tls.key_file)?);

    let tls_certs = rustls_pemfile::certs(&mut certs_file)
        .collect::<Result<Vec<_>, _>>()?;
    let tls_key = rustls_pemfile::private_key(&mut key_file)?
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, format!("No private key found in {}", config.tls.key_file)))?;

    // set up TLS config options
    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(tls_certs, tls_key)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
