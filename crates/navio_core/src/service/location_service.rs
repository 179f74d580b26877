//! Wires a [`LocationProvider`] to a map board by id.
//!
//! Updates that arrive after the board is gone are dropped.

use crate::board::map::MapBoard;
use crate::provider::{LocationProvider, ProviderResult};
use crate::registry::ObjectId;
use log::{debug, info, warn};

/// Seeds the board with the last known coordinate and streams updates to it.
pub fn start_tracking(
    provider: &mut dyn LocationProvider,
    board: ObjectId<MapBoard>,
) -> ProviderResult<()> {
    if let Some(coordinate) = provider.current_coordinate() {
        board.with_mut(|board| board.set_current_location(Some(coordinate)));
    }

    let result = provider.start_updates(Box::new(move |coordinate| {
        if board
            .with_mut(|board| board.set_current_location(Some(coordinate)))
            .is_none()
        {
            debug!("event=location_update module=location status=dropped reason=board_gone");
        }
    }));

    match &result {
        Ok(()) => info!("event=location_start module=location status=ok"),
        Err(err) => warn!(
            "event=location_start module=location status=error code={} retryable={}",
            err.code, err.retryable
        ),
    }
    result
}

pub fn stop_tracking(provider: &mut dyn LocationProvider) {
    provider.stop_updates();
    info!("event=location_stop module=location status=ok");
}
