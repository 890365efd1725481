//! Bounce ECS systems

use bevy::prelude::*;

use super::bounce::{execute_bounce, validate_bounce, BounceError};
use super::config::BounceConfig;
use super::counter::AirBounceCounter;
use super::events::{BounceExecuted, BounceRejected, BounceRejection, BounceRequested, GroundContactChanged};
use crate::components::MotionBody;
use crate::snapshot::SnapshotStore;

/// Система: GroundContactChanged → AirBounceCounter
///
/// Единственный путь, которым меняется ground state актора.
/// Landing сбрасывает air bounce'ы (только на реальном переходе).
pub fn apply_ground_contact(
    mut events: EventReader<GroundContactChanged>,
    mut actors: Query<(&mut AirBounceCounter, &BounceConfig)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for event in events.read() {
        let Ok((mut counter, config)) = actors.get_mut(event.entity) else {
            crate::log_warning(&format!(
                "GroundContactChanged: entity {:?} is not a bounce actor (despawned?)",
                event.entity
            ));
            continue;
        };

        let transitioned = counter.set_ground_contact(event.grounded, now);

        if transitioned && config.log_bounce_events {
            if event.grounded {
                crate::log(&format!("Bounce: {:?} landed at {:.3}s → air bounces reset", event.entity, now));
            } else {
                crate::log(&format!("Bounce: {:?} left ground", event.entity));
            }
        }
    }
}

/// Система: BounceRequested → validate → execute → BounceExecuted / BounceRejected
pub fn process_bounce_requests(
    mut requests: EventReader<BounceRequested>,
    mut actors: Query<(&mut AirBounceCounter, &mut MotionBody, &SnapshotStore, &BounceConfig)>,
    mut executed: EventWriter<BounceExecuted>,
    mut rejected: EventWriter<BounceRejected>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for request in requests.read() {
        let Ok((mut counter, mut body, store, config)) = actors.get_mut(request.entity) else {
            crate::log_warning(&format!(
                "BounceRequested: entity {:?} is not a bounce actor (despawned?)",
                request.entity
            ));
            continue;
        };

        let ticket = match validate_bounce(&counter, &body, config) {
            Ok(ticket) => ticket,
            Err(denied) => {
                if config.log_bounce_events {
                    crate::log(&format!("Bounce: {:?} denied: {}", request.entity, denied));
                }
                rejected.write(BounceRejected {
                    entity: request.entity,
                    rejection: BounceRejection::Denied(denied),
                });
                continue;
            }
        };

        match execute_bounce(&ticket, &mut counter, &mut body, store, config, now) {
            Ok(execution) => {
                if config.log_bounce_events {
                    crate::log(&format!(
                        "Bounce: {:?} {:?} bounce → velocity {:?} (air {}/{}, momentum {:?})",
                        request.entity,
                        execution.kind,
                        execution.velocity,
                        execution.air_bounces,
                        counter.max_air_bounces(),
                        execution.momentum_source
                    ));
                }
                executed.write(BounceExecuted {
                    entity: request.entity,
                    kind: execution.kind,
                    velocity: execution.velocity,
                    air_bounces: execution.air_bounces,
                    momentum_source: execution.momentum_source,
                });
            }
            Err(error) => {
                if let BounceError::ExecutionValidationFailed { .. } = error {
                    crate::log_warning(&format!("Bounce: {:?} state drift: {}", request.entity, error));
                }
                rejected.write(BounceRejected {
                    entity: request.entity,
                    rejection: error.into(),
                });
            }
        }
    }
}
