use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::history::SettlementEntry;
use crate::ledger::BalanceChange;
use crate::round::{GameId, Stage, Tone};
use crate::stats::StatsSnapshot;

// Bounded so a stalled listener cannot grow memory; events to a full
// channel are dropped and the listener is pruned.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<FloorEvent>;
pub type EventReceiver = mpsc::Receiver<FloorEvent>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Balance,
    Log,
    Stats,
    Round,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FloorEvent {
    Balance {
        balance: u64,
        change: BalanceChange,
    },
    Settlement {
        entry: SettlementEntry,
    },
    Stats {
        snapshot: StatsSnapshot,
    },
    Round {
        game: GameId,
        round_id: Uuid,
        stage: Stage,
        status: String,
        tone: Tone,
    },
}

impl FloorEvent {
    pub fn topic(&self) -> Topic {
        match self {
            FloorEvent::Balance { .. } => Topic::Balance,
            FloorEvent::Settlement { .. } => Topic::Log,
            FloorEvent::Stats { .. } => Topic::Stats,
            FloorEvent::Round { .. } => Topic::Round,
        }
    }
}

pub struct EventSubscription {
    bus: EventBus,
    topic: Topic,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Everything already queued, without waiting.
    pub fn drain(&mut self) -> Vec<FloorEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            out.push(event);
        }
        out
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.topic, self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<Topic, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: Topic) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(topic);
        EventSubscription {
            bus: self.clone(),
            topic,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, topic: Topic) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        match self.inner.subscribers.write() {
            Ok(mut guard) => guard.entry(topic).or_default().push((id, tx)),
            Err(_) => tracing::error!(?topic, "subscriber lock poisoned, listener not registered"),
        }
        tracing::debug!(?topic, subscriber_id = id, "listener subscribed");
        (id, rx)
    }

    pub fn publish(&self, event: FloorEvent) {
        let topic = event.topic();
        tracing::trace!(?topic, event = ?event, "publishing floor event");

        let subscribers = match self.inner.subscribers.read() {
            Ok(guard) => guard.get(&topic).cloned(),
            Err(_) => {
                tracing::error!(?topic, "subscriber lock poisoned, event dropped");
                return;
            }
        };

        let Some(list) = subscribers else {
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    ?topic,
                    subscriber_id = id,
                    error = %e,
                    "failed to deliver event to listener"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(topic, &failed);
        }
    }

    pub fn unsubscribe(&self, topic: Topic, subscriber_id: usize) {
        self.remove_subscribers(topic, &[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .map(|guard| guard.values().map(|list| list.len()).sum())
            .unwrap_or(0)
    }

    fn remove_subscribers(&self, topic: Topic, ids: &[usize]) {
        let Ok(mut guard) = self.inner.subscribers.write() else {
            return;
        };
        if let Some(list) = guard.get_mut(&topic) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(&topic);
            }
        }
    }
}
