use std::fmt;
use vdom::{MountId, SurfaceError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchError {
    Surface(SurfaceError),
    /// A MOVE found no node detached for its source position.
    MissingRetained { parent: MountId, from: usize },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Surface(err) => write!(f, "surface rejected patch: {err}"),
            PatchError::MissingRetained { parent, from } => {
                write!(f, "no retained node for move of {parent}[{from}]")
            }
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Surface(err) => Some(err),
            PatchError::MissingRetained { .. } => None,
        }
    }
}

impl From<SurfaceError> for PatchError {
    fn from(err: SurfaceError) -> Self {
        PatchError::Surface(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// The root has nothing rendered to update.
    NotMounted,
    Patch(PatchError),
    Surface(SurfaceError),
    UpdateLimit { limit: usize },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::NotMounted => write!(f, "root has no mounted tree"),
            ReconcileError::Patch(err) => write!(f, "{err}"),
            ReconcileError::Surface(err) => write!(f, "{err}"),
            ReconcileError::UpdateLimit { limit } => {
                write!(f, "more than {limit} state updates in one batch")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Patch(err) => Some(err),
            ReconcileError::Surface(err) => Some(err),
            ReconcileError::NotMounted | ReconcileError::UpdateLimit { .. } => None,
        }
    }
}

impl From<PatchError> for ReconcileError {
    fn from(err: PatchError) -> Self {
        ReconcileError::Patch(err)
    }
}

impl From<SurfaceError> for ReconcileError {
    fn from(err: SurfaceError) -> Self {
        ReconcileError::Surface(err)
    }
}
