use std::sync::Arc;

use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;
use shared_models::LocaleProvider;

use crate::clock::{Clock, SystemClock};

/// Everything a page needs to talk to the backend: configuration, the
/// locale-aware gateway and the wall clock. Cheap to clone.
#[derive(Clone)]
pub struct ClinicContext {
    pub config: Arc<AppConfig>,
    pub api: ClinicApiClient,
    pub clock: Arc<dyn Clock>,
}

impl ClinicContext {
    pub fn new(config: AppConfig, locale: Arc<dyn LocaleProvider>) -> Self {
        Self::with_clock(config, locale, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AppConfig, locale: Arc<dyn LocaleProvider>, clock: Arc<dyn Clock>) -> Self {
        let api = ClinicApiClient::new(&config, locale);
        Self {
            config: Arc::new(config),
            api,
            clock,
        }
    }
}
