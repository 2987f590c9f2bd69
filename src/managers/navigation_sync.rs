//! Browser navigation sync.
//!
//! Mirrors the navigation state of an embedded browser surface into a local
//! [`NavigationState`] and forwards navigation commands to it. State changes
//! only in response to surface events; commands never touch it directly.
//!
//! Everything here runs on the UI thread, hence `Rc`/`RefCell`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::types::navigation::{NavigationPhase, NavigationState, SubscriptionId, SurfaceEventKind};

/// Callback registered for one surface event kind.
pub type SurfaceListener = Rc<dyn Fn()>;

/// Callback receiving every published navigation state.
pub type StateWatcher = Rc<dyn Fn(&NavigationState)>;

/// An embeddable, navigable web view supplied by the host.
pub trait BrowserSurface {
    fn load_url(&self, url: &str);
    fn go_back(&self);
    fn go_forward(&self);
    fn reload(&self);
    fn url(&self) -> String;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn is_loading(&self) -> bool;
    fn subscribe(&self, kind: SurfaceEventKind, listener: SurfaceListener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Listener bookkeeping for surface implementations.
///
/// Listeners are cloned out before being invoked, so a listener may
/// subscribe or unsubscribe while an event is being emitted.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, SurfaceEventKind, SurfaceListener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: SurfaceEventKind, listener: SurfaceListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sid, _, _)| *sid != id);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every listener registered for `kind`, in subscription order.
    pub fn emit(&self, kind: SurfaceEventKind) {
        let matching: Vec<SurfaceListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        for listener in matching {
            listener();
        }
    }
}

/// Normalize a user-entered address.
///
/// Input without an `http://` or `https://` scheme (any case) gets `https://`
/// prepended. Blank input yields `None`.
pub fn normalize_address(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if has_prefix_ignore_case(trimmed, "http://") || has_prefix_ignore_case(trimmed, "https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

struct Shared {
    state: NavigationState,
    phase: NavigationPhase,
    watchers: Vec<StateWatcher>,
}

/// Keeps a [`NavigationState`] in step with one attached [`BrowserSurface`].
pub struct NavigationSync<S: BrowserSurface + 'static> {
    surface: Option<Rc<S>>,
    shared: Rc<RefCell<Shared>>,
    subscriptions: Vec<SubscriptionId>,
}

impl<S: BrowserSurface + 'static> NavigationSync<S> {
    /// Creates an unattached sync whose state starts at `initial_url`.
    pub fn new(initial_url: &str) -> Self {
        Self {
            surface: None,
            shared: Rc::new(RefCell::new(Shared {
                state: NavigationState::with_url(initial_url),
                phase: NavigationPhase::Idle,
                watchers: Vec::new(),
            })),
            subscriptions: Vec::new(),
        }
    }

    /// Bind a surface: subscribe to its lifecycle events and read its state once.
    ///
    /// A previously attached surface is detached first.
    pub fn attach(&mut self, surface: Rc<S>) {
        self.detach();

        for kind in SurfaceEventKind::ALL {
            let listener = match kind {
                SurfaceEventKind::LoadStarted => {
                    let shared = Rc::clone(&self.shared);
                    Rc::new(move || mark_loading(&shared)) as SurfaceListener
                }
                SurfaceEventKind::LoadStopped | SurfaceEventKind::DomReady => {
                    let shared = Rc::clone(&self.shared);
                    let weak: Weak<S> = Rc::downgrade(&surface);
                    Rc::new(move || {
                        if let Some(surface) = weak.upgrade() {
                            settle(&shared, surface.as_ref());
                        }
                    }) as SurfaceListener
                }
            };
            self.subscriptions.push(surface.subscribe(kind, listener));
        }

        settle(&self.shared, surface.as_ref());
        tracing::debug!(url = %self.shared.borrow().state.url, "browser surface attached");
        self.surface = Some(surface);
    }

    /// Remove all event subscriptions and unbind the surface.
    pub fn detach(&mut self) {
        if let Some(surface) = self.surface.take() {
            for id in self.subscriptions.drain(..) {
                surface.unsubscribe(id);
            }
            tracing::debug!("browser surface detached");
        }
        self.subscriptions.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Snapshot of the current navigation state.
    pub fn state(&self) -> NavigationState {
        self.shared.borrow().state.clone()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.shared.borrow().phase
    }

    /// Register a callback for every published state.
    pub fn watch(&self, watcher: impl Fn(&NavigationState) + 'static) {
        self.shared.borrow_mut().watchers.push(Rc::new(watcher));
    }

    pub fn back(&self) {
        if let Some(surface) = &self.surface {
            surface.go_back();
        }
    }

    pub fn forward(&self) {
        if let Some(surface) = &self.surface {
            surface.go_forward();
        }
    }

    pub fn reload(&self) {
        if let Some(surface) = &self.surface {
            surface.reload();
        }
    }

    /// Load `url` as given.
    pub fn navigate_to(&self, url: &str) {
        if let Some(surface) = &self.surface {
            tracing::info!(url, "navigating");
            surface.load_url(url);
        }
    }

    /// Normalize address-bar input and navigate to it.
    ///
    /// Returns the dispatched URL, or `None` when nothing was sent.
    pub fn submit_address(&self, input: &str) -> Option<String> {
        let url = normalize_address(input)?;
        if !self.is_attached() {
            return None;
        }
        self.navigate_to(&url);
        Some(url)
    }
}

impl<S: BrowserSurface + 'static> Drop for NavigationSync<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

fn mark_loading(shared: &Rc<RefCell<Shared>>) {
    let snapshot = {
        let mut inner = shared.borrow_mut();
        inner.state.is_loading = true;
        inner.phase = NavigationPhase::Loading;
        inner.state.clone()
    };
    publish(shared, &snapshot);
}

/// Re-read the surface and publish the result as one new state.
///
/// An empty URL from the surface keeps the last known one.
fn settle<S: BrowserSurface>(shared: &Rc<RefCell<Shared>>, surface: &S) {
    let url = surface.url();
    let can_go_back = surface.can_go_back();
    let can_go_forward = surface.can_go_forward();
    let is_loading = surface.is_loading();

    let snapshot = {
        let mut inner = shared.borrow_mut();
        let url = if url.is_empty() {
            std::mem::take(&mut inner.state.url)
        } else {
            url
        };
        inner.state = NavigationState {
            url,
            can_go_back,
            can_go_forward,
            is_loading,
        };
        inner.phase = NavigationPhase::Settled;
        inner.state.clone()
    };
    publish(shared, &snapshot);
}

fn publish(shared: &Rc<RefCell<Shared>>, state: &NavigationState) {
    let watchers: Vec<StateWatcher> = shared.borrow().watchers.iter().map(Rc::clone).collect();
    for watcher in watchers {
        watcher(state);
    }
}
