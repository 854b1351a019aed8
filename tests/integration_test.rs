use mailcards::config::{Config, DEFAULT_GMAIL_URL};

fn config(server_url: &str, api_key: Option<&str>) -> Config {
    Config {
        server_url: server_url.to_string(),
        thread_id: "thread-1".to_string(),
        assistant_id: "email_assistant".to_string(),
        api_key: api_key.map(str::to_string),
        gmail_url: DEFAULT_GMAIL_URL.to_string(),
    }
}

#[test]
fn test_config_validation_rejects_remote_server_without_api_key() {
    assert!(config("https://assistant.example.com", None).validate().is_err());
    assert!(config("https://assistant.example.com", Some("key"))
        .validate()
        .is_ok());
}

#[test]
fn test_config_validation_allows_local_endpoint_without_api_key() {
    assert!(config("http://localhost:2024", None).validate().is_ok());
    assert!(config("http://127.0.0.1:2024", None).validate().is_ok());
}

#[test]
fn test_config_validation_requires_thread_and_http_scheme() {
    let mut missing_thread = config("http://localhost:2024", None);
    missing_thread.thread_id = "  ".to_string();
    assert!(missing_thread.validate().is_err());

    assert!(config("localhost:2024", None).validate().is_err());
}
