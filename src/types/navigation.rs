use serde::{Deserialize, Serialize};

/// Mirrored navigation state of one browser surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub url: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub is_loading: bool,
}

impl NavigationState {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle events a surface emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceEventKind {
    LoadStarted,
    LoadStopped,
    DomReady,
}

impl SurfaceEventKind {
    pub const ALL: [SurfaceEventKind; 3] = [
        SurfaceEventKind::LoadStarted,
        SurfaceEventKind::LoadStopped,
        SurfaceEventKind::DomReady,
    ];
}

/// Handle returned by a surface subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Where a synced surface currently is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPhase {
    Idle,
    Loading,
    Settled,
}
