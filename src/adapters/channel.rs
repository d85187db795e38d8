//! In-process state and event channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the application
//! state machine and the GPIO worker thread.  Blocking receives run the
//! channel future on the calling thread with `futures-lite`.  Dropping
//! the last [`StatePublisher`] closes the state stream.
//!
//! ```text
//! ┌───────────────┐   State    ┌──────────────┐
//! │ State machine │───────────▶│  GPIO worker │
//! │   (master)    │◀───────────│ + button IRQs│
//! └───────────────┘ (Worker,   └──────────────┘
//!                    AppEvent)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use futures_lite::future::{block_on, or};
use log::debug;

use crate::app::events::{AppEvent, Worker};
use crate::app::ports::{ChannelError, EventSender, StateSource};
use crate::app::states::State;

/// Channel depth for inbound states.
pub const STATE_DEPTH: usize = 8;

/// Channel depth for outbound events.
pub const EVENT_DEPTH: usize = 16;

type StateQueue = Channel<CriticalSectionRawMutex, State, STATE_DEPTH>;
type EventQueue = Channel<CriticalSectionRawMutex, (Worker, AppEvent), EVENT_DEPTH>;

// ── States: state machine → GPIO worker ──────────────────────

/// Queue plus the hang-up bookkeeping shared by both halves.
struct StateLink {
    queue: StateQueue,
    publishers: AtomicUsize,
    hung_up: Signal<CriticalSectionRawMutex, ()>,
}

/// Create a connected state publisher / receiver pair.
pub fn state_channel() -> (StatePublisher, StateReceiver) {
    let link = Arc::new(StateLink {
        queue: StateQueue::new(),
        publishers: AtomicUsize::new(1),
        hung_up: Signal::new(),
    });
    (
        StatePublisher {
            link: Arc::clone(&link),
        },
        StateReceiver { link },
    )
}

/// Producer half, held by the state machine.  The receiver reports
/// [`ChannelError::Closed`] once every clone is dropped and the queue
/// has drained.
pub struct StatePublisher {
    link: Arc<StateLink>,
}

impl StatePublisher {
    /// Publish `state`, waiting while the channel is full.
    pub fn publish(&self, state: State) {
        block_on(self.link.queue.send(state));
    }

    /// Publish `state` unless the channel is full.
    pub fn try_publish(&self, state: State) -> Result<(), ChannelError> {
        self.link
            .queue
            .try_send(state)
            .map_err(|_| ChannelError::Full)
    }
}

impl Clone for StatePublisher {
    fn clone(&self) -> Self {
        self.link.publishers.fetch_add(1, Ordering::AcqRel);
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl Drop for StatePublisher {
    fn drop(&mut self) {
        if self.link.publishers.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("states: last publisher gone");
            self.link.hung_up.signal(());
        }
    }
}

/// Consumer half, held by the GPIO worker.
pub struct StateReceiver {
    link: Arc<StateLink>,
}

impl StateSource for StateReceiver {
    fn recv_state(&mut self) -> Result<State, ChannelError> {
        let link = &*self.link;
        loop {
            // Queued states are delivered even after the hang-up.
            if let Ok(state) = link.queue.try_receive() {
                return Ok(state);
            }
            if link.publishers.load(Ordering::Acquire) == 0 {
                return Err(ChannelError::Closed);
            }

            let received = block_on(or(async { Some(link.queue.receive().await) }, async {
                link.hung_up.wait().await;
                None
            }));
            if let Some(state) = received {
                return Ok(state);
            }
        }
    }
}

// ── Events: GPIO worker → state machine ──────────────────────

/// Create a connected event sender / receiver pair.
pub fn event_channel() -> (EventQueueSender, EventReceiver) {
    let queue = Arc::new(EventQueue::new());
    (
        EventQueueSender {
            queue: Arc::clone(&queue),
        },
        EventReceiver { queue },
    )
}

/// Producer half; a full queue is reported, never waited on, because
/// senders run on interrupt threads.
#[derive(Clone)]
pub struct EventQueueSender {
    queue: Arc<EventQueue>,
}

impl EventSender for EventQueueSender {
    fn send(&self, target: Worker, event: AppEvent) -> Result<(), ChannelError> {
        self.queue
            .try_send((target, event))
            .map_err(|_| ChannelError::Full)
    }
}

/// Consumer half, held by the master worker.
pub struct EventReceiver {
    queue: Arc<EventQueue>,
}

impl EventReceiver {
    /// Block until the next event arrives.
    pub fn recv(&self) -> (Worker, AppEvent) {
        block_on(self.queue.receive())
    }

    pub fn try_recv(&self) -> Option<(Worker, AppEvent)> {
        self.queue.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
