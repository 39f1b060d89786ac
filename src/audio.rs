//! Sound cues
//!
//! The simulation only names the sounds it wants; playback belongs to
//! whatever `Frontend` is attached.

/// Sound effect triggers raised during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Player fired a shot
    ShotFired,
    /// Something was destroyed (or a gate solved)
    Explosion,
    /// Player lost a life
    LifeLost,
    /// Shield came up
    ShieldActivated,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::ShotFired => "shot",
            Cue::Explosion => "explosion",
            Cue::LifeLost => "life_lost",
            Cue::ShieldActivated => "shield",
        }
    }
}
