use crossterm::event::Event;

#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    Tick,
    /// Sent by the session's error sink when a failure should surface as a popup
    SessionError {
        message: String,
        expected: bool,
    },
}
