//! Scene data: drawable objects and the animation policy that edits them.
//!
//! Nothing here touches the GPU directly; renderers in `crate::render` read the
//! objects once per frame.

mod animation;
mod object;

pub use animation::RevealAnimation;
pub use object::{GameObject, ObjectId, Transform2d};
