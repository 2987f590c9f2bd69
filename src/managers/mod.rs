// Banana Studio state managers
// Managers hold UI-side state: the studio session and the browser navigation mirror.

pub mod navigation_sync;
pub mod studio_session;
