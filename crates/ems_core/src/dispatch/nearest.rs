use super::policy::{DispatchCandidate, DispatchPolicy};
use crate::model::{Call, VehicleKind};
use crate::travel::TravelModel;

/// Myopic nearest-vehicle dispatch.
///
/// Ranks idle vehicles by travel time to the scene, ties to the lowest vehicle
/// id. A call without a stated need gets the single nearest vehicle. A call
/// with per-kind counts gets the nearest vehicles of each kind, as many as are
/// idle up to the count; a partial crew is still sent. Future arrivals are not
/// considered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestIdle;

impl DispatchPolicy for NearestIdle {
    fn select<'a>(
        &self,
        call: &Call,
        candidates: &'a [DispatchCandidate],
        travel: &TravelModel,
        now_s: f64,
    ) -> Vec<&'a DispatchCandidate> {
        let mut ranked: Vec<(f64, &DispatchCandidate)> = candidates
            .iter()
            .map(|c| (travel.eta(c.location, call.scene, Some(now_s)), c))
            .collect();
        ranked.sort_by(|(eta_a, a), (eta_b, b)| {
            eta_a
                .total_cmp(eta_b)
                .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
        });

        let Some(need) = call.need else {
            return ranked.first().map(|(_, c)| *c).into_iter().collect();
        };
        let mut remaining = need;
        let mut chosen = Vec::new();
        for (_, candidate) in ranked {
            let left = match candidate.kind {
                VehicleKind::Ambulance => &mut remaining.ambulances,
                VehicleKind::RapidResponse => &mut remaining.rapid_response,
            };
            if *left > 0 {
                *left -= 1;
                chosen.push(candidate);
                if remaining.total() == 0 {
                    break;
                }
            }
        }
        chosen
    }

    fn name(&self) -> &'static str {
        "nearest_idle"
    }
}
