//! Annotation node and rendering interfaces
//!
//! Ties the placer to the location-tracking and rendering collaborators.

pub mod node;
pub mod surface;

pub use node::AnnotationNode;
pub use surface::{RecordingSurface, RenderSurface};
