//! `BrowserSurface` adapter over a `wry` web view.
//!
//! wry reports page loads but keeps no queryable history, so the adapter
//! tracks back/forward stacks from finished loads. Load events reach it
//! through the event loop (`on_page_load`, `on_dom_ready`); it then emits them
//! to its subscribers.

use std::cell::{Cell, RefCell};

use wry::WebView;

use crate::managers::navigation_sync::{BrowserSurface, ListenerRegistry, SurfaceListener};
use crate::types::navigation::{SubscriptionId, SurfaceEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Back,
    Forward,
    Reload,
}

#[derive(Debug, Default)]
struct History {
    back: Vec<String>,
    current: String,
    forward: Vec<String>,
    pending: Option<Traversal>,
}

impl History {
    fn record(&mut self, url: &str) {
        match self.pending.take() {
            Some(Traversal::Reload) => {}
            Some(Traversal::Back) if self.back.last().map(String::as_str) == Some(url) => {
                self.back.pop();
                let previous = std::mem::replace(&mut self.current, url.to_string());
                self.forward.push(previous);
            }
            Some(Traversal::Forward) if self.forward.last().map(String::as_str) == Some(url) => {
                self.forward.pop();
                let previous = std::mem::replace(&mut self.current, url.to_string());
                self.back.push(previous);
            }
            _ if self.current == url => {}
            _ => {
                if !self.current.is_empty() {
                    let previous = std::mem::replace(&mut self.current, url.to_string());
                    self.back.push(previous);
                } else {
                    self.current = url.to_string();
                }
                self.forward.clear();
            }
        }
    }
}

/// The browser window's web view, exposed as a [`BrowserSurface`].
pub struct WrySurface {
    webview: WebView,
    registry: ListenerRegistry,
    history: RefCell<History>,
    loading: Cell<bool>,
}

impl WrySurface {
    pub fn new(webview: WebView) -> Self {
        Self {
            webview,
            registry: ListenerRegistry::new(),
            history: RefCell::new(History::default()),
            loading: Cell::new(true),
        }
    }

    pub fn webview(&self) -> &WebView {
        &self.webview
    }

    /// Feed a page-load notification from wry.
    pub fn on_page_load(&self, started: bool, url: &str) {
        if started {
            self.loading.set(true);
            self.registry.emit(SurfaceEventKind::LoadStarted);
        } else {
            self.loading.set(false);
            self.history.borrow_mut().record(url);
            self.registry.emit(SurfaceEventKind::LoadStopped);
        }
    }

    /// Feed the `DOMContentLoaded` notification posted by the injected script.
    pub fn on_dom_ready(&self) {
        self.registry.emit(SurfaceEventKind::DomReady);
    }

    fn run_script(&self, js: &str) {
        if let Err(err) = self.webview.evaluate_script(js) {
            tracing::warn!(error = %err, "script evaluation failed");
        }
    }
}

impl BrowserSurface for WrySurface {
    fn load_url(&self, url: &str) {
        self.history.borrow_mut().pending = None;
        if let Err(err) = self.webview.load_url(url) {
            tracing::warn!(url, error = %err, "load_url failed");
        }
    }

    fn go_back(&self) {
        if self.can_go_back() {
            self.history.borrow_mut().pending = Some(Traversal::Back);
            self.run_script("history.back()");
        }
    }

    fn go_forward(&self) {
        if self.can_go_forward() {
            self.history.borrow_mut().pending = Some(Traversal::Forward);
            self.run_script("history.forward()");
        }
    }

    fn reload(&self) {
        self.history.borrow_mut().pending = Some(Traversal::Reload);
        self.run_script("location.reload()");
    }

    fn url(&self) -> String {
        let current = self.history.borrow().current.clone();
        if current.is_empty() {
            self.webview.url().unwrap_or_default()
        } else {
            current
        }
    }

    fn can_go_back(&self) -> bool {
        !self.history.borrow().back.is_empty()
    }

    fn can_go_forward(&self) -> bool {
        !self.history.borrow().forward.is_empty()
    }

    fn is_loading(&self) -> bool {
        self.loading.get()
    }

    fn subscribe(&self, kind: SurfaceEventKind, listener: SurfaceListener) -> SubscriptionId {
        self.registry.subscribe(kind, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.registry.unsubscribe(id);
    }
}
