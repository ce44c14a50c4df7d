use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use shared_models::{Locale, LocaleProvider};

use crate::models::{LocaleChanged, LocaleError};

const CHANNEL_CAPACITY: usize = 16;

/// Process-wide language preference. Persisted as a single string in a file
/// and announced to subscribers on every change.
pub struct LocaleStore {
    current: RwLock<Locale>,
    path: Option<PathBuf>,
    sender: broadcast::Sender<LocaleChanged>,
    // Held across compare, persist, swap and send so one change yields one event.
    update: Mutex<()>,
}

impl LocaleStore {
    /// Reads the persisted preference, defaulting to `ru` when the file is
    /// missing or holds an unknown code.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let locale = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring persisted locale in {}: {}", path.display(), e);
                Locale::default()
            }),
            Err(e) => {
                debug!("No persisted locale at {} ({}), using default", path.display(), e);
                Locale::default()
            }
        };

        info!("Locale store loaded with language {}", locale);
        Self::build(locale, Some(path))
    }

    /// Store that never touches the filesystem.
    pub fn in_memory(locale: Locale) -> Self {
        Self::build(locale, None)
    }

    fn build(locale: Locale, path: Option<PathBuf>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(locale),
            path,
            sender,
            update: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Locale {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists `locale` and notifies subscribers. Returns `false` without
    /// notifying when the locale is already active.
    pub async fn set(&self, locale: Locale) -> Result<bool, LocaleError> {
        let _update = self.update.lock().await;

        let previous = self.current();
        if previous == locale {
            debug!("Locale {} already active", locale);
            return Ok(false);
        }

        if let Some(path) = &self.path {
            tokio::fs::write(path, locale.code()).await?;
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = locale;

        info!("Locale changed from {} to {}", previous, locale);

        // No receivers is fine: nothing is on screen to refresh.
        let _ = self.sender.send(LocaleChanged {
            previous,
            current: locale,
        });

        Ok(true)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocaleChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl LocaleProvider for LocaleStore {
    fn current(&self) -> Locale {
        LocaleStore::current(self)
    }
}
