use genai_service::config::GenaiConfig;
use genai_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service pointed at a fake Gemini endpoint.
    pub async fn spawn(gemini_base: &str, api_key: &str) -> Self {
        let mut config = GenaiConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.google.api_base = gemini_base.to_string();
        config.google.api_key = api_key.to_string();
        config.models.text_model = "gemini-test".to_string();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the HTTP server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
