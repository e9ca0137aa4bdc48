pub mod call_arrive;
pub mod dispatch;
pub mod job_complete;
pub mod loc_update;
pub mod scene_depart;

pub use dispatch::{DispatchContext, DispatchOutcome};
