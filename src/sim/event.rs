/// Events emitted by the session.
/// The presentation layer consumes these for audio and logging.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// A fresh set of entities is in play.
    SessionStarted,
    MusicToggled { on: bool },
    CoinCollected { index: usize },
    HeroDefeated,
    Victory,
}
