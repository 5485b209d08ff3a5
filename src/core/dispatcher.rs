use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::core::input::KeyActuator;
use crate::core::keys::ScanKey;

/// Requested actuation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Press,
    Release,
}

/// One actuation request on its way to the key actuator.
#[derive(Debug, Clone, Copy)]
pub struct Intent {
    pub channel: usize,
    pub key: ScanKey,
    pub kind: IntentKind,
    pub requested_at: Instant,
}

/// An intent plus the time the worker should deliver it.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledIntent {
    pub intent: Intent,
    pub deliver_at: Instant,
}

struct QueueState {
    items: VecDeque<ScheduledIntent>,
    closed: bool,
    dropped: u64,
}

/// Bounded FIFO between the detection loop and the actuation worker.
///
/// The producer side never blocks: when the queue is full the oldest entry
/// is dropped and counted, so a stalled actuator can slow actuation but
/// never sampling. Order is strict FIFO, which is what keeps per-channel
/// press/release sequences intact downstream.
pub struct DispatchQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    capacity: usize,
}

impl DispatchQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
                dropped: 0,
            }),
            available: Condvar::new(),
            capacity: capacity.max(1),
        }
    }

    /// Producer side. Never blocks; overflow drops the oldest entry.
    pub fn push(&self, item: ScheduledIntent) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        if state.items.len() == self.capacity {
            state.items.pop_front();
            state.dropped += 1;
            log::warn!(
                "Dispatch queue full ({}), dropped oldest intent ({} total)",
                self.capacity,
                state.dropped
            );
        }
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
    }

    /// No more intents will arrive; the worker drains what is queued and
    /// then exits. Safe to call more than once.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }

    pub fn dropped_count(&self) -> u64 {
        self.state.lock().unwrap().dropped
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Consumer side: next intent, or None once closed and fully drained.
    fn pop(&self) -> Option<ScheduledIntent> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self.available.wait(state).unwrap();
        }
    }
}

/// The consumer thread: sleeps until each intent's scheduled time, then
/// fires it at the actuator. All humanizer-introduced sleeping happens
/// here, never in the detection loop.
pub struct ActuationWorker {
    handle: Option<JoinHandle<()>>,
}

impl ActuationWorker {
    pub fn spawn<A>(queue: Arc<DispatchQueue>, mut actuator: A) -> Result<Self, String>
    where
        A: KeyActuator + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("actuation-worker".to_string())
            .spawn(move || {
                while let Some(scheduled) = queue.pop() {
                    let now = Instant::now();
                    if scheduled.deliver_at > now {
                        thread::sleep(scheduled.deliver_at - now);
                    }
                    let intent = scheduled.intent;
                    let result = match intent.kind {
                        IntentKind::Press => actuator.press(intent.key),
                        IntentKind::Release => actuator.release(intent.key),
                    };
                    if let Err(e) = result {
                        log::warn!("Key actuation failed for {}: {}", intent.key.label(), e);
                    }
                }
            })
            .map_err(|e| format!("Failed to spawn actuation worker: {}", e))?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the worker to finish draining. Idempotent.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
