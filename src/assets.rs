//! Asset catalogue and load readiness
//!
//! The game starts once every gating asset has either loaded or failed, or
//! once the timeout elapses, whichever comes first. [`ReadinessLatch`] is that
//! policy as a plain value: the browser loader feeds it load/error callbacks
//! and a timer, and it hands back a single [`Readiness`] report.

use std::fmt;

/// Every external resource the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    CarImage,
    ObstacleImage,
    BackgroundImage,
    BackgroundMusic,
    GameplayLoop,
    MoveCue,
    GameOverCue,
    DisplayFont,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
    Font,
}

impl AssetId {
    pub const IMAGES: [AssetId; 3] = [
        AssetId::CarImage,
        AssetId::ObstacleImage,
        AssetId::BackgroundImage,
    ];

    pub const AUDIO: [AssetId; 4] = [
        AssetId::BackgroundMusic,
        AssetId::GameplayLoop,
        AssetId::MoveCue,
        AssetId::GameOverCue,
    ];

    /// Assets the game waits for before the first frame
    pub const GATING: [AssetId; 4] = [
        AssetId::CarImage,
        AssetId::ObstacleImage,
        AssetId::BackgroundImage,
        AssetId::DisplayFont,
    ];

    pub fn kind(self) -> AssetKind {
        match self {
            AssetId::CarImage | AssetId::ObstacleImage | AssetId::BackgroundImage => {
                AssetKind::Image
            }
            AssetId::DisplayFont => AssetKind::Font,
            _ => AssetKind::Audio,
        }
    }

    /// Path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            AssetId::CarImage => "car.png",
            AssetId::ObstacleImage => "obstacle.png",
            AssetId::BackgroundImage => "background.png",
            AssetId::BackgroundMusic => "backgroundMusic.mp3",
            AssetId::GameplayLoop => "gameplaySound.mp3",
            AssetId::MoveCue => "moveSound.mp3",
            AssetId::GameOverCue => "gameOverSound.mp3",
            AssetId::DisplayFont => "SerifGothicStd-Heavy.otf",
        }
    }
}

/// A resource that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetError {
    pub asset: AssetId,
    pub reason: String,
}

impl AssetError {
    pub fn new(asset: AssetId, reason: impl Into<String>) -> Self {
        Self {
            asset,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to load {:?} ({}): {}",
            self.asset,
            self.asset.path(),
            self.reason
        )
    }
}

impl std::error::Error for AssetError {}

/// Why the latch fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyReason {
    /// Every asset loaded or failed
    AllSettled,
    /// The timeout elapsed first
    TimedOut,
}

/// Snapshot handed out when the latch fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub reason: ReadyReason,
    pub loaded: Vec<AssetId>,
    pub failed: Vec<AssetId>,
    /// Still outstanding when the timeout fired
    pub pending: Vec<AssetId>,
}

impl Readiness {
    pub fn is_loaded(&self, asset: AssetId) -> bool {
        self.loaded.contains(&asset)
    }
}

/// Count-down latch over a fixed set of loads, plus a timeout.
///
/// Fires at most once.
#[derive(Debug, Clone)]
pub struct ReadinessLatch {
    pending: Vec<AssetId>,
    loaded: Vec<AssetId>,
    failed: Vec<AssetId>,
    fired: bool,
}

impl ReadinessLatch {
    pub fn new(assets: impl IntoIterator<Item = AssetId>) -> Self {
        let mut pending: Vec<AssetId> = Vec::new();
        for asset in assets {
            if !pending.contains(&asset) {
                pending.push(asset);
            }
        }
        Self {
            pending,
            loaded: Vec::new(),
            failed: Vec::new(),
            fired: false,
        }
    }

    /// Record the outcome of one load.
    ///
    /// Returns the report when this was the last outstanding asset. Unknown
    /// or already settled assets are ignored.
    pub fn settle(&mut self, asset: AssetId, result: Result<(), AssetError>) -> Option<Readiness> {
        let Some(pos) = self.pending.iter().position(|a| *a == asset) else {
            log::debug!("Ignoring duplicate settle for {:?}", asset);
            return None;
        };
        self.pending.remove(pos);

        match result {
            Ok(()) => {
                self.loaded.push(asset);
                log::info!(
                    "Loaded {}. Settled {}/{}",
                    asset.path(),
                    self.settled(),
                    self.total()
                );
            }
            Err(e) => {
                log::warn!("{}; using fallback", e);
                self.failed.push(asset);
            }
        }

        self.check()
    }

    /// Fire if nothing is pending (also covers an empty latch)
    pub fn check(&mut self) -> Option<Readiness> {
        if self.pending.is_empty() {
            self.fire(ReadyReason::AllSettled)
        } else {
            None
        }
    }

    /// The timeout elapsed: fire with whatever is available
    pub fn time_out(&mut self) -> Option<Readiness> {
        if !self.fired && !self.pending.is_empty() {
            log::warn!(
                "Timed out waiting for {:?}; starting with fallbacks",
                self.pending
            );
        }
        self.fire(ReadyReason::TimedOut)
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn settled(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }

    pub fn total(&self) -> usize {
        self.settled() + self.pending.len()
    }

    fn fire(&mut self, reason: ReadyReason) -> Option<Readiness> {
        if self.fired {
            return None;
        }
        self.fired = true;
        Some(Readiness {
            reason,
            loaded: self.loaded.clone(),
            failed: self.failed.clone(),
            pending: self.pending.clone(),
        })
    }
}
