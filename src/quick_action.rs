//! Canned requests offered before the first exchange

/// Shortcut that pre-fills the draft. Never submits on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    FindCoffee,
    Restrooms,
    TrackFlight,
}

impl QuickAction {
    pub const ALL: [QuickAction; 3] = [
        QuickAction::FindCoffee,
        QuickAction::Restrooms,
        QuickAction::TrackFlight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::FindCoffee => "☕ Find Coffee",
            QuickAction::Restrooms => "🚽 Restrooms",
            QuickAction::TrackFlight => "✈️ Track UA400",
        }
    }

    /// Text placed in the draft
    pub fn phrase(self) -> &'static str {
        match self {
            QuickAction::FindCoffee => "Where is the nearest coffee?",
            QuickAction::Restrooms => "Where are the restrooms?",
            QuickAction::TrackFlight => "Status of UA400",
        }
    }

    /// Console command that triggers the action
    pub fn command(self) -> &'static str {
        match self {
            QuickAction::FindCoffee => "/coffee",
            QuickAction::Restrooms => "/restrooms",
            QuickAction::TrackFlight => "/track",
        }
    }

    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.command() == command)
    }
}
