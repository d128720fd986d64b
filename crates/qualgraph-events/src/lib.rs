use crossbeam_channel::{unbounded, Receiver, Sender};
use qualgraph_core::NodeKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Shell -> graph
    /// Redraw the graph. `root: None` shows the whole hierarchy.
    RenderRequested {
        root: Option<NodeKey>,
        monochrome: bool,
        enlarge_category_font: bool,
    },
    NodeTextEdited {
        node: NodeKey,
        text: String,
    },
    NodeDragged {
        node: NodeKey,
        x: f32,
        y: f32,
    },
    NodeMemoRequested {
        node: NodeKey,
    },
    NodeMemoSubmitted {
        node: NodeKey,
        text: String,
    },

    // Graph -> shell
    /// The memo was kept in memory but could not be written to the store.
    MemoSaveFailed {
        node: NodeKey,
        reason: String,
    },
    ShowError {
        message: String,
    },
}

impl Event {
    /// The node an event concerns, if any.
    pub fn node(&self) -> Option<NodeKey> {
        match self {
            Event::NodeTextEdited { node, .. }
            | Event::NodeDragged { node, .. }
            | Event::NodeMemoRequested { node }
            | Event::NodeMemoSubmitted { node, .. }
            | Event::MemoSaveFailed { node, .. } => Some(*node),
            Event::RenderRequested { root, .. } => *root,
            Event::ShowError { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Drain pending events into a listener.
    ///
    /// Events a listener publishes while handling are queued behind the
    /// current batch and delivered by the next call.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        let pending: Vec<Event> = self.rx.try_iter().collect();
        for event in &pending {
            listener.handle_event(event);
        }
    }

    /// Take every pending event without dispatching.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Components that respond to events from the [`EventBus`].
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
