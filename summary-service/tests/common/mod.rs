use summary_service::config::SummaryConfig;
use summary_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service against fake document and genai services.
    pub async fn spawn(document_service_url: &str, genai_service_url: &str) -> Self {
        let mut config = SummaryConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.document_service.base_url = document_service_url.to_string();
        config.genai_service.base_url = genai_service_url.to_string();

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
