use std::sync::Arc;

/// Knobs of a reconciliation root.
#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// First segment of every mount id issued by the root.
    pub root_token: Arc<str>,
    /// State updates drained in one batch before the root gives up with
    /// [`crate::ReconcileError::UpdateLimit`]. Guards against components that
    /// request state from `did_update` unconditionally.
    pub max_updates_per_batch: usize,
    pub warn_on_duplicate_keys: bool,
    /// Keep a copy of the structural operations of the most recent flush.
    pub record_patches: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            root_token: Arc::from("0"),
            max_updates_per_batch: 1024,
            warn_on_duplicate_keys: true,
            record_patches: false,
        }
    }
}

impl ReconcilerConfig {
    pub fn recording() -> Self {
        Self {
            record_patches: true,
            ..Self::default()
        }
    }
}
