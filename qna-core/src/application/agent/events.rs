use std::sync::{Arc, RwLock};

/// Progress notifications from the task executor. Delivery is synchronous
/// and fire-and-forget; implementations should return quickly.
pub trait TaskObserver: Send + Sync {
    fn on_fetching_document(&self, _uri: &str) {}

    fn on_calling_tool(&self, _name: &str, _arguments: &str) {}
}

/// Shared subscriber list. Cloning shares the list.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Arc<RwLock<Vec<Arc<dyn TaskObserver>>>>,
}

impl ObserverSet {
    pub fn subscribe(&self, observer: Arc<dyn TaskObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    fn each(&self, f: impl Fn(&dyn TaskObserver)) {
        if let Ok(observers) = self.observers.read() {
            for observer in observers.iter() {
                f(observer.as_ref());
            }
        }
    }
}

impl TaskObserver for ObserverSet {
    fn on_fetching_document(&self, uri: &str) {
        self.each(|o| o.on_fetching_document(uri));
    }

    fn on_calling_tool(&self, name: &str, arguments: &str) {
        self.each(|o| o.on_calling_tool(name, arguments));
    }
}
