use std::time::{Duration, Instant};

/// Debounce thresholds the state machine runs under, resolved for the
/// active play mode.
#[derive(Debug, Clone, Copy)]
pub struct TimingPolicy {
    /// Minimum dwell after a press before an unmatched frame may release.
    pub min_hold_time: Duration,
    /// Minimum gap after a release before the next press may arm.
    pub min_release_interval: Duration,
    /// A match this soon after a release while armed is a stacked note.
    pub double_signal_threshold: Duration,
}

impl TimingPolicy {
    pub fn from_millis(hold_ms: u64, release_ms: u64, double_ms: u64) -> Self {
        Self {
            min_hold_time: Duration::from_millis(hold_ms),
            min_release_interval: Duration::from_millis(release_ms),
            double_signal_threshold: Duration::from_millis(double_ms),
        }
    }
}

/// What one sampled reading asks the engine to do for this channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    None,
    Press,
    Release,
    /// A second note arrived while the previous press still overlaps:
    /// release and press again as one pair, no idle gap in between.
    Repress,
}

/// Debounce state machine for a single channel.
///
/// Raw per-frame color sampling flickers at note edges; the hold-time and
/// release-interval thresholds turn that noisy signal into exactly one
/// press and one release per visual note. Owned and mutated only by the
/// detection thread.
#[derive(Debug)]
pub struct NoteState {
    armed: bool,
    /// Set while a humanizer miss is eating the current note; cleared by the
    /// first unmatched reading.
    suppressed: bool,
    /// A stacked-note pair already went out for the current release window;
    /// cleared on the next real release.
    repressed: bool,
    last_press: Option<Instant>,
    last_release: Option<Instant>,
}

impl NoteState {
    pub fn new() -> Self {
        Self {
            armed: false,
            suppressed: false,
            repressed: false,
            last_press: None,
            last_release: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed one reading. At most one event (or one release+press pair)
    /// comes out per reading; everything else leaves the state untouched.
    pub fn advance(&mut self, matched: bool, now: Instant, policy: &TimingPolicy) -> NoteEvent {
        if self.suppressed {
            if !matched {
                self.suppressed = false;
            }
            return NoteEvent::None;
        }

        if matched {
            if !self.armed {
                if self.release_gap_elapsed(now, policy) {
                    self.armed = true;
                    self.last_press = Some(now);
                    return NoteEvent::Press;
                }
            } else if self.is_stacked_note(now, policy) {
                self.repressed = true;
                self.last_press = Some(now);
                return NoteEvent::Repress;
            }
        } else if self.armed && self.hold_elapsed(now, policy) {
            self.armed = false;
            self.repressed = false;
            self.last_release = Some(now);
            return NoteEvent::Release;
        }

        NoteEvent::None
    }

    /// Take back a press the humanizer decided to miss. The whole note is
    /// skipped: nothing stays armed and further matched readings are ignored
    /// until the note leaves the sample point.
    pub fn cancel_press(&mut self) {
        self.armed = false;
        self.suppressed = true;
    }

    /// Disarm at stop time. Returns true when a forced release must be
    /// synthesized for this channel.
    pub fn force_release(&mut self, now: Instant) -> bool {
        self.suppressed = false;
        self.repressed = false;
        if self.armed {
            self.armed = false;
            self.last_release = Some(now);
            true
        } else {
            false
        }
    }

    fn release_gap_elapsed(&self, now: Instant, policy: &TimingPolicy) -> bool {
        match self.last_release {
            Some(at) => now.duration_since(at) >= policy.min_release_interval,
            None => true,
        }
    }

    fn hold_elapsed(&self, now: Instant, policy: &TimingPolicy) -> bool {
        match self.last_press {
            Some(at) => now.duration_since(at) >= policy.min_hold_time,
            None => true,
        }
    }

    // One pair per release window: once the pair has gone out, continued
    // matched readings inside the window stay silent.
    fn is_stacked_note(&self, now: Instant, policy: &TimingPolicy) -> bool {
        if self.repressed {
            return false;
        }
        match self.last_release {
            Some(at) => now.duration_since(at) < policy.double_signal_threshold,
            None => false,
        }
    }
}

impl Default for NoteState {
    fn default() -> Self {
        Self::new()
    }
}
