use serde_json::Value;

/// The navigation state the endpoint delegates to.
///
/// Every operation receives the `params` of the bus message exactly as they arrived. Calls are
/// synchronous and report nothing back: the endpoint answers `SUCCESS` once the call returns.
pub trait NavigationModel {
    /// `Navigation.ShowConstantTBT`
    fn tbt_activate(&mut self, params: &Value);

    /// `Navigation.UpdateTurnList`
    fn tbt_turn_list_update(&mut self, params: &Value);

    /// `Navigation.AlertManeuver`
    fn on_navigation_alert_maneuver(&mut self, params: &Value);

    /// `Navigation.StartStream`
    fn start_stream(&mut self, params: &Value);

    /// `Navigation.StopStream`
    fn stop_stream(&mut self, params: &Value);

    /// Stop-stream notification pushed by the bus.
    fn on_stop_stream(&mut self, params: &Value);
}
