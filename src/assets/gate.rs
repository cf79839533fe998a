//! Parallel model loading and the loading gate.
//!
//! Every registered path gets its own background thread; results come back
//! over a channel that the gate drains once per frame without blocking. A
//! load has *settled* when it produced either a model or an error. The gate
//! stays open (`is_loading() == true`) until every load has settled, then
//! closes exactly once. A failed load counts as settled; a load that never
//! returns keeps the gate open for good; a loader that panics settles its
//! path as failed once every worker has exited.

use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{AssetError, AssetLoader, LoadedModel, ModelRegistry};

type LoadResult = (String, Result<LoadedModel, AssetError>);

/// Load state of one registered path.
#[derive(Debug, Clone)]
pub enum AssetSlot {
    /// Still loading.
    Pending,
    /// Loaded successfully.
    Ready(Arc<LoadedModel>),
    /// Settled with an error.
    Failed(AssetError),
}

impl AssetSlot {
    /// Whether the load has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Tracks the background loads of every registered model.
pub struct LoadingGate {
    results: mpsc::Receiver<LoadResult>,
    slots: FxHashMap<String, AssetSlot>,
    total: usize,
    settled: usize,
    loading: bool,
}

impl LoadingGate {
    /// Start loading every path in `registry` on its own thread.
    ///
    /// A thread that cannot be spawned settles its path as failed right away.
    #[must_use]
    pub fn start(registry: &ModelRegistry, loader: Arc<dyn AssetLoader>) -> Self {
        let (tx, rx) = mpsc::channel::<LoadResult>();
        let mut slots = FxHashMap::default();
        let mut settled = 0;

        for (i, path) in registry.iter().enumerate() {
            let tx = tx.clone();
            let loader = Arc::clone(&loader);
            let owned = path.to_owned();
            let spawned = std::thread::Builder::new()
                .name(format!("asset-load-{i}"))
                .spawn(move || {
                    let result = loader.load(&owned);
                    let _ = tx.send((owned, result));
                });
            let slot = match spawned {
                Ok(_detached) => AssetSlot::Pending,
                Err(e) => {
                    log::warn!("could not start loading {path}: {e}");
                    settled += 1;
                    AssetSlot::Failed(AssetError::Worker(e.to_string()))
                }
            };
            let _ = slots.insert(path.to_owned(), slot);
        }

        let total = slots.len();
        let loading = settled < total;
        if loading {
            log::info!("loading {total} models");
        }
        Self {
            results: rx,
            slots,
            total,
            settled,
            loading,
        }
    }

    /// Drain finished loads. Returns `true` on the call that closes the gate.
    ///
    /// Once every worker is gone, paths still pending (a loader that
    /// panicked) settle as failed.
    pub fn poll(&mut self) -> bool {
        loop {
            match self.results.try_recv() {
                Ok((path, result)) => self.settle(path, result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.abandon_pending();
                    break;
                }
            }
        }

        if self.loading && self.settled >= self.total {
            self.loading = false;
            log::info!("all {} models settled", self.total);
            return true;
        }
        false
    }

    fn settle(&mut self, path: String, result: Result<LoadedModel, AssetError>) {
        let slot = match result {
            Ok(model) => {
                log::debug!("loaded {path}");
                AssetSlot::Ready(Arc::new(model))
            }
            Err(e) => {
                log::warn!("failed to load {path}: {e}");
                AssetSlot::Failed(e)
            }
        };
        if let Some(previous) = self.slots.insert(path, slot) {
            if !previous.is_settled() {
                self.settled += 1;
            }
        }
    }

    fn abandon_pending(&mut self) {
        let pending: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| !slot.is_settled())
            .map(|(path, _)| path.clone())
            .collect();
        for path in pending {
            let error = AssetError::Worker("loader exited without a result".to_owned());
            self.settle(path, Err(error));
        }
    }

    /// Whether any registered load is still pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of settled loads.
    #[must_use]
    pub fn settled(&self) -> usize {
        self.settled
    }

    /// Number of registered loads.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Load state of a path, `None` if it was never registered.
    #[must_use]
    pub fn slot(&self, path: &str) -> Option<&AssetSlot> {
        self.slots.get(path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Succeeds for paths starting with `ok`, fails otherwise.
    struct ScriptedLoader;

    impl AssetLoader for ScriptedLoader {
        fn load(&self, path: &str) -> Result<LoadedModel, AssetError> {
            if path.starts_with("ok") {
                Ok(LoadedModel::default())
            } else {
                Err(AssetError::NotFound(path.into()))
            }
        }
    }

    /// Blocks every load until the test releases it.
    struct HeldLoader {
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl AssetLoader for HeldLoader {
        fn load(&self, _path: &str) -> Result<LoadedModel, AssetError> {
            if let Ok(rx) = self.release.lock() {
                let _ = rx.recv();
            }
            Ok(LoadedModel::default())
        }
    }

    /// Panics on paths starting with `bad`.
    struct PanickingLoader;

    impl AssetLoader for PanickingLoader {
        fn load(&self, path: &str) -> Result<LoadedModel, AssetError> {
            assert!(!path.starts_with("bad"), "decoder blew up on {path}");
            Ok(LoadedModel::default())
        }
    }

    fn poll_until_closed(gate: &mut LoadingGate) -> bool {
        for _ in 0..500 {
            let _ = gate.poll();
            if !gate.is_loading() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn empty_registry_is_closed_immediately() {
        let gate = LoadingGate::start(&ModelRegistry::default(), Arc::new(ScriptedLoader));
        assert!(!gate.is_loading());
        assert_eq!(gate.total(), 0);
    }

    #[test]
    fn closes_after_all_loads_settle() {
        let registry = ModelRegistry::from_paths(["ok/a", "ok/b", "ok/c"]);
        let mut gate = LoadingGate::start(&registry, Arc::new(ScriptedLoader));
        assert!(gate.is_loading());
        assert!(poll_until_closed(&mut gate));
        assert_eq!(gate.settled(), 3);
        assert!(matches!(gate.slot("ok/b"), Some(AssetSlot::Ready(_))));
    }

    #[test]
    fn failure_counts_as_settled() {
        let registry = ModelRegistry::from_paths(["ok/a", "missing"]);
        let mut gate = LoadingGate::start(&registry, Arc::new(ScriptedLoader));
        assert!(poll_until_closed(&mut gate));
        assert!(matches!(gate.slot("missing"), Some(AssetSlot::Failed(_))));
        assert!(matches!(gate.slot("ok/a"), Some(AssetSlot::Ready(_))));
    }

    #[test]
    fn stays_open_while_a_load_is_outstanding() {
        let (release, held) = mpsc::channel();
        let loader = HeldLoader {
            release: Mutex::new(held),
        };
        let registry = ModelRegistry::from_paths(["slow"]);
        let mut gate = LoadingGate::start(&registry, Arc::new(loader));
        for _ in 0..20 {
            assert!(!gate.poll());
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(gate.is_loading());
        assert!(matches!(gate.slot("slow"), Some(AssetSlot::Pending)));

        release.send(()).unwrap();
        assert!(poll_until_closed(&mut gate));
    }

    #[test]
    fn panicking_loader_settles_as_failed() {
        let registry = ModelRegistry::from_paths(["ok/a", "bad"]);
        let mut gate = LoadingGate::start(&registry, Arc::new(PanickingLoader));
        assert!(poll_until_closed(&mut gate));
        assert_eq!(gate.settled(), 2);
        assert!(matches!(gate.slot("ok/a"), Some(AssetSlot::Ready(_))));
        assert!(matches!(
            gate.slot("bad"),
            Some(AssetSlot::Failed(AssetError::Worker(_)))
        ));
    }

    #[test]
    fn closes_exactly_once() {
        let registry = ModelRegistry::from_paths(["ok/a"]);
        let mut gate = LoadingGate::start(&registry, Arc::new(ScriptedLoader));
        let mut transitions = 0;
        for _ in 0..500 {
            if gate.poll() {
                transitions += 1;
            }
            if !gate.is_loading() && transitions > 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        for _ in 0..10 {
            assert!(!gate.poll());
        }
        assert_eq!(transitions, 1);
    }
}
