use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::dispatcher::{ActuationWorker, DispatchQueue, Intent, IntentKind, ScheduledIntent};
use crate::core::frame::FrameSource;
use crate::core::humanizer::{Humanizer, PressPlan};
use crate::core::input::KeyActuator;
use crate::core::note_state::{NoteEvent, NoteState, TimingPolicy};
use crate::core::sampler;
use crate::settings::{AppSettings, ChannelConfig, PlayMode};

const MAX_EVENT_LINES: usize = 100;
/// Detection cadence yield; also the poll interval while no frame exists.
const LOOP_YIELD: Duration = Duration::from_millis(1);

/// Everything the detection loop needs, snapshotted at start time.
#[derive(Clone)]
pub struct EngineConfig {
    pub channels: Vec<ChannelConfig>,
    pub policy: TimingPolicy,
    pub humanizer: Option<Humanizer>,
    pub queue_capacity: usize,
}

impl EngineConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        let policy = TimingPolicy::from_millis(
            settings.timing.hold_ms(settings.mode),
            settings.timing.min_release_ms,
            settings.timing.double_note_ms,
        );
        // Rapid mode is about raw speed; the humanizer only runs in Normal
        let humanizer = (settings.humanizer.enabled && settings.mode == PlayMode::Normal)
            .then(|| Humanizer::from_settings(&settings.humanizer));
        Self {
            channels: settings.channels.clone(),
            policy,
            humanizer,
            queue_capacity: settings.queue_capacity,
        }
    }
}

/// Per-session counters, shown in the UI next to the status line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub presses: u64,
    pub releases: u64,
    pub missed: u64,
    pub dropped: u64,
}

/// Owns the detection thread and the actuation worker.
///
/// The detection thread samples every channel against the latest frame and
/// runs the per-channel state machines; anything they emit is scheduled
/// (possibly humanized) and handed to the dispatch queue. The worker does
/// all the sleeping. Stopping force-releases whatever is still armed, lets
/// the worker drain, and joins both threads.
pub struct PlayerEngine {
    running: Arc<Mutex<bool>>,
    status: Arc<Mutex<String>>,
    stats: Arc<Mutex<SessionStats>>,
    events: Arc<Mutex<VecDeque<String>>>,
    detection: Option<JoinHandle<()>>,
    worker: Option<ActuationWorker>,
    queue: Option<Arc<DispatchQueue>>,
}

impl PlayerEngine {
    pub fn new() -> Self {
        Self {
            running: Arc::new(Mutex::new(false)),
            status: Arc::new(Mutex::new("Idle".to_string())),
            stats: Arc::new(Mutex::new(SessionStats::default())),
            events: Arc::new(Mutex::new(VecDeque::new())),
            detection: None,
            worker: None,
            queue: None,
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap()
    }

    pub fn status(&self) -> String {
        self.status.lock().unwrap().clone()
    }

    pub fn stats(&self) -> SessionStats {
        let mut stats = *self.stats.lock().unwrap();
        if let Some(queue) = &self.queue {
            stats.dropped = queue.dropped_count();
        }
        stats
    }

    /// Event feed snapshot, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().cloned().collect()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Validate the configuration and launch both threads.
    pub fn start<S, A>(&mut self, config: EngineConfig, source: S, actuator: A) -> Result<(), String>
    where
        S: FrameSource + Send + 'static,
        A: KeyActuator + Send + 'static,
    {
        if self.is_running() {
            return Err("Already running".to_string());
        }
        if config.channels.is_empty() {
            return Err("No channels configured".to_string());
        }
        let (width, height) = source.region_bounds();
        for channel in &config.channels {
            if channel.pos.0 >= width || channel.pos.1 >= height {
                return Err(format!(
                    "{} samples ({}, {}) outside the {}x{} capture region",
                    channel.label, channel.pos.0, channel.pos.1, width, height
                ));
            }
        }

        let queue = Arc::new(DispatchQueue::new(config.queue_capacity));
        let worker = ActuationWorker::spawn(queue.clone(), actuator)?;

        *self.running.lock().unwrap() = true;
        *self.status.lock().unwrap() = "Running".to_string();
        *self.stats.lock().unwrap() = SessionStats::default();
        self.events.lock().unwrap().clear();

        let running = self.running.clone();
        let status = self.status.clone();
        let stats = self.stats.clone();
        let events = self.events.clone();
        let loop_queue = queue.clone();

        let detection = thread::Builder::new()
            .name("detection-loop".to_string())
            .spawn(move || {
                detection_loop(config, source, loop_queue, running, stats, events);
                *status.lock().unwrap() = "Stopped".to_string();
            })
            .map_err(|e| format!("Failed to spawn detection loop: {}", e));

        match detection {
            Ok(handle) => {
                log::info!("Detection started");
                self.detection = Some(handle);
                self.worker = Some(worker);
                self.queue = Some(queue);
                Ok(())
            }
            Err(e) => {
                *self.running.lock().unwrap() = false;
                queue.close();
                let mut worker = worker;
                worker.join();
                Err(e)
            }
        }
    }

    /// Stop sampling, flush forced releases, drain the worker. A second
    /// call finds nothing to join and does nothing.
    pub fn stop(&mut self) {
        *self.running.lock().unwrap() = false;
        if let Some(handle) = self.detection.take() {
            let _ = handle.join();
        }
        if let Some(mut worker) = self.worker.take() {
            worker.join();
        }
        if let Some(queue) = self.queue.take() {
            let dropped = queue.dropped_count();
            if dropped > 0 {
                self.stats.lock().unwrap().dropped = dropped;
                log::warn!("Session dropped {} intents on overflow", dropped);
            }
            let stats = *self.stats.lock().unwrap();
            log::info!(
                "Detection stopped ({} presses, {} releases, {} missed)",
                stats.presses,
                stats.releases,
                stats.missed
            );
        }
    }
}

impl Default for PlayerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PlayerEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn detection_loop<S: FrameSource>(
    config: EngineConfig,
    mut source: S,
    queue: Arc<DispatchQueue>,
    running: Arc<Mutex<bool>>,
    stats: Arc<Mutex<SessionStats>>,
    events: Arc<Mutex<VecDeque<String>>>,
) {
    let channels = config.channels;
    let policy = config.policy;
    let humanizer = config.humanizer;
    let mut states: Vec<NoteState> = (0..channels.len()).map(|_| NoteState::new()).collect();
    // Humanizer delay applied to each channel's pending press; its release
    // rides on the same delay so the physical hold matches the detected one.
    let mut press_delays: Vec<Duration> = vec![Duration::ZERO; channels.len()];
    let mut rng = rand::thread_rng();

    while *running.lock().unwrap() {
        let Some(frame) = source.latest_frame() else {
            thread::sleep(LOOP_YIELD);
            continue;
        };
        let now = Instant::now();

        for (index, channel) in channels.iter().enumerate() {
            let matched = sampler::sample(&frame, channel);
            match states[index].advance(matched, now, &policy) {
                NoteEvent::Press => {
                    let plan = match &humanizer {
                        Some(h) => h.plan_press(&mut rng),
                        None => PressPlan::After(Duration::ZERO),
                    };
                    match plan {
                        PressPlan::Miss => {
                            states[index].cancel_press();
                            press_delays[index] = Duration::ZERO;
                            stats.lock().unwrap().missed += 1;
                            push_event(
                                &events,
                                format!("{}: note missed on purpose", channel.label),
                            );
                        }
                        PressPlan::After(delay) => {
                            press_delays[index] = delay;
                            queue.push(scheduled(index, channel, IntentKind::Press, now, now + delay));
                            stats.lock().unwrap().presses += 1;
                            push_event(
                                &events,
                                format!("{}: pressed {}", channel.label, channel.key.label()),
                            );
                        }
                    }
                }
                NoteEvent::Release => {
                    let base = now + press_delays[index];
                    let deliver_at = match &humanizer {
                        Some(h) => h.shift_release(base, &mut rng),
                        None => base,
                    };
                    queue.push(scheduled(index, channel, IntentKind::Release, now, deliver_at));
                    stats.lock().unwrap().releases += 1;
                    push_event(
                        &events,
                        format!("{}: released {}", channel.label, channel.key.label()),
                    );
                }
                NoteEvent::Repress => {
                    // Stacked note: the pair goes out back to back, unhumanized
                    press_delays[index] = Duration::ZERO;
                    queue.push(scheduled(index, channel, IntentKind::Release, now, now));
                    queue.push(scheduled(index, channel, IntentKind::Press, now, now));
                    let mut s = stats.lock().unwrap();
                    s.releases += 1;
                    s.presses += 1;
                    drop(s);
                    push_event(
                        &events,
                        format!("{}: double note on {}", channel.label, channel.key.label()),
                    );
                }
                NoteEvent::None => {}
            }
        }

        thread::sleep(LOOP_YIELD);
    }

    // Cleanup: no channel may stay armed past stop
    let now = Instant::now();
    for (index, channel) in channels.iter().enumerate() {
        if states[index].force_release(now) {
            let deliver_at = now + press_delays[index];
            queue.push(scheduled(index, channel, IntentKind::Release, now, deliver_at));
            stats.lock().unwrap().releases += 1;
            push_event(
                &events,
                format!("{}: forced release of {}", channel.label, channel.key.label()),
            );
        }
    }
    queue.close();
}

fn scheduled(
    channel: usize,
    config: &ChannelConfig,
    kind: IntentKind,
    requested_at: Instant,
    deliver_at: Instant,
) -> ScheduledIntent {
    ScheduledIntent {
        intent: Intent {
            channel,
            key: config.key,
            kind,
            requested_at,
        },
        deliver_at,
    }
}

fn push_event(events: &Arc<Mutex<VecDeque<String>>>, line: String) {
    log::debug!("{}", line);
    let mut feed = events.lock().unwrap();
    if feed.len() == MAX_EVENT_LINES {
        feed.pop_front();
    }
    feed.push_back(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::Frame;
    use crate::core::keys::ScanKey;
    use crate::settings::HumanizerSettings;
    use image::Rgb;

    const NOTE: (u8, u8, u8) = (217, 0, 255);

    /// Frame source whose sample pixel follows a schedule of
    /// (offset, matched) segments relative to construction time.
    struct TimelineSource {
        start: Instant,
        segments: Vec<(Duration, bool)>,
    }

    impl TimelineSource {
        fn new(segments: Vec<(u64, bool)>) -> Self {
            Self {
                start: Instant::now(),
                segments: segments
                    .into_iter()
                    .map(|(ms, matched)| (Duration::from_millis(ms), matched))
                    .collect(),
            }
        }

        fn matched_now(&self) -> bool {
            let elapsed = self.start.elapsed();
            let mut current = false;
            for (offset, matched) in &self.segments {
                if elapsed >= *offset {
                    current = *matched;
                }
            }
            current
        }
    }

    impl FrameSource for TimelineSource {
        fn latest_frame(&mut self) -> Option<Frame> {
            let mut frame = Frame::new(20, 20);
            if self.matched_now() {
                frame.put_pixel(10, 10, Rgb([NOTE.0, NOTE.1, NOTE.2]));
            }
            Some(frame)
        }

        fn region_bounds(&self) -> (u32, u32) {
            (20, 20)
        }
    }

    #[derive(Clone)]
    struct RecordingActuator {
        calls: Arc<Mutex<Vec<(IntentKind, Instant)>>>,
    }

    impl RecordingActuator {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl KeyActuator for RecordingActuator {
        fn press(&mut self, _key: ScanKey) -> Result<(), String> {
            self.calls
                .lock()
                .unwrap()
                .push((IntentKind::Press, Instant::now()));
            Ok(())
        }

        fn release(&mut self, _key: ScanKey) -> Result<(), String> {
            self.calls
                .lock()
                .unwrap()
                .push((IntentKind::Release, Instant::now()));
            Ok(())
        }
    }

    fn one_lane() -> Vec<ChannelConfig> {
        vec![ChannelConfig::new("Lane 1", ScanKey::A, (10, 10), NOTE)]
    }

    fn config(channels: Vec<ChannelConfig>, humanizer: Option<Humanizer>) -> EngineConfig {
        EngineConfig {
            channels,
            policy: TimingPolicy::from_millis(40, 20, 40),
            humanizer,
            queue_capacity: 64,
        }
    }

    #[test]
    fn test_start_rejects_empty_channel_set() {
        let mut engine = PlayerEngine::new();
        let err = engine
            .start(
                config(Vec::new(), None),
                TimelineSource::new(vec![(0, false)]),
                RecordingActuator::new(),
            )
            .unwrap_err();
        assert!(err.contains("No channels"), "{}", err);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_start_rejects_channel_outside_region() {
        let mut engine = PlayerEngine::new();
        let channels = vec![ChannelConfig::new("Lane 1", ScanKey::A, (25, 10), NOTE)];
        let err = engine
            .start(
                config(channels, None),
                TimelineSource::new(vec![(0, false)]),
                RecordingActuator::new(),
            )
            .unwrap_err();
        assert!(err.contains("Lane 1"), "{}", err);
        assert!(err.contains("20x20"), "{}", err);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_note_produces_one_press_then_one_release() {
        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        // Note visible for 150ms, then gone
        let source = TimelineSource::new(vec![(0, true), (150, false)]);
        engine.start(config(one_lane(), None), source, actuator).unwrap();
        thread::sleep(Duration::from_millis(350));
        engine.stop();

        let recorded = calls.lock().unwrap();
        let kinds: Vec<_> = recorded.iter().map(|c| c.0).collect();
        assert_eq!(kinds, vec![IntentKind::Press, IntentKind::Release]);
        // Release is hold-gated, so at least min_hold_time after the press
        let held = recorded[1].1.duration_since(recorded[0].1);
        assert!(held >= Duration::from_millis(40), "held {:?}", held);

        let stats = engine.stats();
        assert_eq!(stats.presses, 1);
        assert_eq!(stats.releases, 1);
    }

    #[test]
    fn test_reaction_delay_preserves_hold_duration() {
        let mut settings = HumanizerSettings::default();
        settings.reaction_time_ms = 120;
        settings.random_delay_ms = 0;
        settings.miss_chance_pct = 0.0;
        settings.hold_variation_ms = 0;
        settings.timing_error_ms = 0;
        let humanizer = Humanizer::from_settings(&settings);

        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        // Note visible for 60ms, well inside the 120ms reaction delay: the
        // release is detected before the press has even been delivered
        let source = TimelineSource::new(vec![(0, true), (60, false)]);
        engine
            .start(config(one_lane(), Some(humanizer)), source, actuator)
            .unwrap();
        thread::sleep(Duration::from_millis(400));
        engine.stop();

        let recorded = calls.lock().unwrap();
        let kinds: Vec<_> = recorded.iter().map(|c| c.0).collect();
        assert_eq!(kinds, vec![IntentKind::Press, IntentKind::Release]);
        // The release rides on the same delay as its press, so the key is
        // physically held for the detected duration
        let held = recorded[1].1.duration_since(recorded[0].1);
        assert!(held >= Duration::from_millis(40), "key held only {:?}", held);
    }

    #[test]
    fn test_stacked_note_delivers_single_pair_in_order() {
        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        // Release at 60ms, re-match at 85ms, then the note stays lit; the
        // wide double-note window would re-fire every tick without latching
        let source = TimelineSource::new(vec![(0, true), (60, false), (85, true)]);
        let mut cfg = config(one_lane(), None);
        cfg.policy = TimingPolicy::from_millis(40, 20, 200);
        engine.start(cfg, source, actuator).unwrap();
        thread::sleep(Duration::from_millis(400));
        engine.stop();

        // Press, release, new press, exactly one release+press pair, and
        // the forced release at stop
        let kinds: Vec<_> = calls.lock().unwrap().iter().map(|c| c.0).collect();
        assert_eq!(
            kinds,
            vec![
                IntentKind::Press,
                IntentKind::Release,
                IntentKind::Press,
                IntentKind::Release,
                IntentKind::Press,
                IntentKind::Release,
            ]
        );
    }

    #[test]
    fn test_stop_force_releases_armed_channel() {
        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        // Note never leaves the sample point
        let source = TimelineSource::new(vec![(0, true)]);
        engine.start(config(one_lane(), None), source, actuator).unwrap();
        thread::sleep(Duration::from_millis(120));
        engine.stop();

        let kinds: Vec<_> = calls.lock().unwrap().iter().map(|c| c.0).collect();
        assert_eq!(kinds, vec![IntentKind::Press, IntentKind::Release]);
        let stats = engine.stats();
        assert_eq!(stats.presses, stats.releases);
        assert!(engine
            .events()
            .iter()
            .any(|line| line.contains("forced release")));
    }

    #[test]
    fn test_full_miss_chance_suppresses_whole_note() {
        let mut settings = HumanizerSettings::default();
        settings.miss_chance_pct = 100.0;
        settings.reaction_time_ms = 0;
        settings.random_delay_ms = 0;
        let humanizer = Humanizer::from_settings(&settings);

        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        let source = TimelineSource::new(vec![(0, true), (100, false)]);
        engine
            .start(config(one_lane(), Some(humanizer)), source, actuator)
            .unwrap();
        thread::sleep(Duration::from_millis(250));
        engine.stop();

        assert!(calls.lock().unwrap().is_empty());
        let stats = engine.stats();
        assert_eq!(stats.presses, 0);
        assert_eq!(stats.releases, 0);
        assert_eq!(stats.missed, 1);
    }

    #[test]
    fn test_zero_miss_chance_never_suppresses() {
        let mut settings = HumanizerSettings::default();
        settings.miss_chance_pct = 0.0;
        settings.reaction_time_ms = 0;
        settings.random_delay_ms = 0;
        settings.hold_variation_ms = 0;
        settings.timing_error_ms = 0;
        let humanizer = Humanizer::from_settings(&settings);

        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        let source = TimelineSource::new(vec![(0, true), (150, false)]);
        engine
            .start(config(one_lane(), Some(humanizer)), source, actuator)
            .unwrap();
        thread::sleep(Duration::from_millis(350));
        engine.stop();

        let kinds: Vec<_> = calls.lock().unwrap().iter().map(|c| c.0).collect();
        assert_eq!(kinds, vec![IntentKind::Press, IntentKind::Release]);
        assert_eq!(engine.stats().missed, 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut engine = PlayerEngine::new();
        engine.stop();
        engine
            .start(
                config(one_lane(), None),
                TimelineSource::new(vec![(0, false)]),
                RecordingActuator::new(),
            )
            .unwrap();
        assert!(engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
        assert_eq!(engine.status(), "Stopped");
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut engine = PlayerEngine::new();
        engine
            .start(
                config(one_lane(), None),
                TimelineSource::new(vec![(0, false)]),
                RecordingActuator::new(),
            )
            .unwrap();
        let err = engine
            .start(
                config(one_lane(), None),
                TimelineSource::new(vec![(0, false)]),
                RecordingActuator::new(),
            )
            .unwrap_err();
        assert_eq!(err, "Already running");
        engine.stop();
    }

    #[test]
    fn test_two_channels_each_balance() {
        let channels = vec![
            ChannelConfig::new("Lane 1", ScanKey::A, (10, 10), NOTE),
            ChannelConfig::new("Lane 2", ScanKey::S, (5, 5), NOTE),
        ];
        let mut engine = PlayerEngine::new();
        let actuator = RecordingActuator::new();
        let calls = actuator.calls.clone();
        // Both lanes light up together and stay lit until stop
        let source = TimelineSource2::new();
        engine.start(config(channels, None), source, actuator).unwrap();
        thread::sleep(Duration::from_millis(120));
        engine.stop();

        let recorded = calls.lock().unwrap();
        let presses = recorded.iter().filter(|c| c.0 == IntentKind::Press).count();
        let releases = recorded
            .iter()
            .filter(|c| c.0 == IntentKind::Release)
            .count();
        assert_eq!(presses, 2);
        assert_eq!(releases, 2);
    }

    /// Both test pixels lit from the start.
    struct TimelineSource2;

    impl TimelineSource2 {
        fn new() -> Self {
            Self
        }
    }

    impl FrameSource for TimelineSource2 {
        fn latest_frame(&mut self) -> Option<Frame> {
            let mut frame = Frame::new(20, 20);
            frame.put_pixel(10, 10, Rgb([NOTE.0, NOTE.1, NOTE.2]));
            frame.put_pixel(5, 5, Rgb([NOTE.0, NOTE.1, NOTE.2]));
            Some(frame)
        }

        fn region_bounds(&self) -> (u32, u32) {
            (20, 20)
        }
    }
}
