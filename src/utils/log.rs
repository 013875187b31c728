use actix_web::HttpRequest;
use chrono::Local;

// Format one access-log line, or an error-log line when `error_message` is set
pub fn log_request(
    req: &HttpRequest,
    status_code: u16,
    error_message: Option<&str>,
) -> String {
    let referer = req.headers()
        .get("Referer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    let user_agent = req.headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let client_ip = req.peer_addr().map(|addr| addr.ip().to_string()).unwrap_or_else(|| "unknown".to_string());
    let request_method = req.method().as_str();
    let request_uri = req.uri().to_string();
    let http_version = format!("{:?}", req.version());
    let time = Local::now().format("%d/%b/%Y:%H:%M:%S %z");

    let access_line = format!(
        "{client_ip} - - [{time}] \"{request_method} {request_uri} {http_version}\" {status_code} \"{referer}\" \"{user_agent}\""
    );
    match error_message {
        Some(msg) => format!("{access_line} \"{msg}\""),
        None => access_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn access_line_has_request_and_status() {
        let req = TestRequest::post()
            .uri("/api/create-invite")
            .insert_header(("User-Agent", "form/1.0"))
            .to_http_request();

        let line = log_request(&req, 200, None);
        assert!(line.contains("\"POST /api/create-invite HTTP/1.1\" 200"));
        assert!(line.ends_with("\"-\" \"form/1.0\""));
    }

    #[test]
    fn error_line_appends_message() {
        let req = TestRequest::post().uri("/api/create-invite").to_http_request();
        let line = log_request(&req, 500, Some("Request to Trustpilot failed"));
        assert!(line.ends_with("\"unknown\" \"Request to Trustpilot failed\""));
    }
}
