// Shared - hot-swappable classifier handle
//
// Readers take an Arc snapshot of the current facade and classify without
// holding the lock. Reloading builds the replacement facade first and swaps
// it in atomically, so concurrent classification never sees a half-loaded
// model.

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::analysis::classifier::ClassifierFacade;
use crate::error::{log_model_error, ModelError};

/// Thread-safe holder of the active classifier facade
pub struct SharedClassifier {
    current: RwLock<Arc<ClassifierFacade>>,
}

impl SharedClassifier {
    pub fn new(facade: ClassifierFacade) -> Self {
        Self {
            current: RwLock::new(Arc::new(facade)),
        }
    }

    /// Current facade
    ///
    /// # Returns
    /// * `Err(StatePoisoned)` - A writer panicked while holding the lock
    pub fn snapshot(&self) -> Result<Arc<ClassifierFacade>, ModelError> {
        match self.current.read() {
            Ok(guard) => Ok(Arc::clone(&guard)),
            Err(_) => {
                let err = ModelError::StatePoisoned;
                log_model_error(&err, "SharedClassifier::snapshot");
                Err(err)
            }
        }
    }

    /// Replace the active facade, returning the previous one
    pub fn swap(&self, facade: ClassifierFacade) -> Result<Arc<ClassifierFacade>, ModelError> {
        let replacement = Arc::new(facade);
        match self.current.write() {
            Ok(mut guard) => Ok(std::mem::replace(&mut *guard, replacement)),
            Err(_) => {
                let err = ModelError::StatePoisoned;
                log_model_error(&err, "SharedClassifier::swap");
                Err(err)
            }
        }
    }

    /// Load the artifact at `path` into a new facade (same rules and
    /// extractor as the current one) and swap it in.
    ///
    /// Loading failures degrade to the rule-based path exactly as at startup.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<Arc<ClassifierFacade>, ModelError> {
        let current = self.snapshot()?;
        let facade = ClassifierFacade::load(
            path,
            *current.rules(),
            Arc::clone(current.extractor()),
        )
        .with_context_secs(current.context_secs());
        log::info!(
            "[SharedClassifier] Reloaded classifier (state: {:?})",
            facade.state()
        );
        self.swap(facade)?;
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::{ClassifierState, RuleBasedClassifier};
    use crate::analysis::features::FeatureExtractor;

    fn untrained() -> ClassifierFacade {
        ClassifierFacade::untrained(
            RuleBasedClassifier::default(),
            Arc::new(FeatureExtractor::new()),
        )
    }

    #[test]
    fn test_snapshot_and_swap() {
        let shared = SharedClassifier::new(untrained().with_context_secs(2.0));
        let before = shared.snapshot().unwrap();

        let previous = shared.swap(untrained()).unwrap();
        assert!(Arc::ptr_eq(&before, &previous));

        let after = shared.snapshot().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.context_secs(), 2.0);
    }

    #[test]
    fn test_reload_missing_artifact_stays_untrained() {
        let shared = SharedClassifier::new(untrained().with_context_secs(1.5));
        let reloaded = shared
            .reload("/nonexistent/blank_classifier.json")
            .unwrap();
        assert_eq!(reloaded.state(), ClassifierState::Untrained);
        assert_eq!(reloaded.context_secs(), 1.5);
    }

    #[test]
    fn test_poisoned_lock_reports_error() {
        let shared = Arc::new(SharedClassifier::new(untrained()));
        let clone = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = clone.current.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(shared.snapshot().unwrap_err(), ModelError::StatePoisoned);
        assert_eq!(shared.swap(untrained()).unwrap_err(), ModelError::StatePoisoned);
    }
}
