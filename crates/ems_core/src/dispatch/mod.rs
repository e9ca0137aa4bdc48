pub mod nearest;
pub mod policy;

use bevy_ecs::prelude::Resource;

pub use nearest::NearestIdle;
pub use policy::{DispatchCandidate, DispatchPolicy};

/// Resource wrapper for the dispatch policy trait object.
#[derive(Resource)]
pub struct DispatchPolicyResource(pub Box<dyn DispatchPolicy>);

impl DispatchPolicyResource {
    pub fn new(policy: Box<dyn DispatchPolicy>) -> Self {
        Self(policy)
    }
}

impl Default for DispatchPolicyResource {
    fn default() -> Self {
        Self(Box::new(NearestIdle))
    }
}

impl std::ops::Deref for DispatchPolicyResource {
    type Target = dyn DispatchPolicy;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
