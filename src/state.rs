use crate::config::Config;
use crate::services::chat::ChatClient;
use crate::services::prediction::PredictionClient;
use crate::store::ResultStore;
use anyhow::Result;

/// Everything the session loops need: configuration, the two backend
/// clients (sharing one HTTP client), and the local result store.
pub struct AppState {
    pub config: Config,
    pub chat: ChatClient,
    pub prediction: PredictionClient,
    pub store: ResultStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let chat = ChatClient::new(http.clone(), config.chat_url.clone());
        let prediction = PredictionClient::new(http, config.predict_url.clone());
        let store = ResultStore::new(config.data_dir.clone());
        Ok(Self {
            config,
            chat,
            prediction,
            store,
        })
    }
}
