//! Location provider contract.

use super::ProviderResult;
use crate::model::place::Coordinate;

/// Callback receiving location updates on the owning thread.
pub type LocationHandler = Box<dyn FnMut(Coordinate)>;

pub trait LocationProvider {
    /// Last known coordinate, if any.
    fn current_coordinate(&self) -> Option<Coordinate>;

    /// Starts streaming updates to `handler`, replacing any previous handler.
    fn start_updates(&mut self, handler: LocationHandler) -> ProviderResult<()>;

    /// Stops streaming. No-op when not started.
    fn stop_updates(&mut self);
}
