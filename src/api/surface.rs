//! Rendering surface seam

use crate::core::PlacementResult;

/// Receives computed transforms and applies them to the scene node and its
/// children
pub trait RenderSurface {
    fn apply(&mut self, result: &PlacementResult);
}

impl<R: RenderSurface + ?Sized> RenderSurface for &mut R {
    fn apply(&mut self, result: &PlacementResult) {
        (**self).apply(result)
    }
}

/// Surface that keeps every applied transform in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    applied: Vec<PlacementResult>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[PlacementResult] {
        &self.applied
    }

    pub fn last(&self) -> Option<&PlacementResult> {
        self.applied.last()
    }
}

impl RenderSurface for RecordingSurface {
    fn apply(&mut self, result: &PlacementResult) {
        self.applied.push(*result);
    }
}
