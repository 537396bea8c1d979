#![forbid(unsafe_code)]

//! Menu commands sent to the engine outside the frame cycle.

/// A control request for the engine.
///
/// Commands are fire-and-forget. Toggle-style commands answer with the new
/// toggle value, which the caller may display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Pause,
    Weather,
    Brain,
    BrainCode,
    Territory,
    TideDaylight,
    Flood,
    HealthyCarrier,
    Follow,
    SocialWeb,
    ClearErrors,
    PreviousAgent,
    NextAgent,
}

impl MenuCommand {
    /// Every command, in id order.
    pub const ALL: [Self; 13] = [
        Self::Pause,
        Self::Weather,
        Self::Brain,
        Self::BrainCode,
        Self::Territory,
        Self::TideDaylight,
        Self::Flood,
        Self::HealthyCarrier,
        Self::Follow,
        Self::SocialWeb,
        Self::ClearErrors,
        Self::PreviousAgent,
        Self::NextAgent,
    ];

    /// Numeric command id on the engine's command channel.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Whether the engine answers this command with a toggle state.
    #[must_use]
    pub const fn reports_state(self) -> bool {
        matches!(
            self,
            Self::Pause
                | Self::Weather
                | Self::Brain
                | Self::BrainCode
                | Self::Territory
                | Self::TideDaylight
                | Self::Follow
                | Self::SocialWeb
        )
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Weather => "Weather",
            Self::Brain => "Brain",
            Self::BrainCode => "Brain Code",
            Self::Territory => "Territory",
            Self::TideDaylight => "Daylight Tide",
            Self::Flood => "Flood",
            Self::HealthyCarrier => "Healthy Carrier",
            Self::Follow => "Follow",
            Self::SocialWeb => "Social Web",
            Self::ClearErrors => "Clear Errors",
            Self::PreviousAgent => "Previous Agent",
            Self::NextAgent => "Next Agent",
        }
    }
}
