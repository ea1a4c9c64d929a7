//! Actor-based concurrency for the grid ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! one task owns the [`GridLedger`] and processes each operation to
//! completion before the next begins. That reproduces the serialized
//! global ordering of the reference execution environment: no caller ever
//! observes a partially-applied mutation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              Callers (API surface)                    │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ GridHandle (Clone)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              mpsc::channel (bounded)                  │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │             GridActor (single task)                   │
//! │   owns GridLedger: validate → mutate → append → emit  │
//! └─────────────────────┬────────────────────────────────┘
//!                       │ drained events, call order
//!                       ▼
//!              event sink (UnboundedReceiver)
//! ```

use grid_ledger::{
    Config, Error, GridLedger, GridStats, LedgerEvent, Node, NodeId, Result, Transaction,
};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the grid actor
pub enum GridMessage {
    /// Register a new node
    RegisterNode {
        id: NodeId,
        name: String,
        response: oneshot::Sender<Result<()>>,
    },

    /// Record claimed production, minting credits
    RecordProduction {
        id: NodeId,
        energy_amount: u64,
        response: oneshot::Sender<Result<u64>>,
    },

    /// Execute an atomic trade
    Trade {
        seller: NodeId,
        buyer: NodeId,
        energy_amount: u64,
        response: oneshot::Sender<Result<u64>>,
    },

    /// Toggle node activation (owner-only)
    SetNodeActive {
        caller: NodeId,
        id: NodeId,
        value: bool,
        response: oneshot::Sender<Result<()>>,
    },

    /// Get a node snapshot
    GetNode {
        id: NodeId,
        response: oneshot::Sender<Result<Node>>,
    },

    /// Get a transaction record
    GetTransaction {
        id: u64,
        response: oneshot::Sender<Result<Transaction>>,
    },

    /// Count active nodes
    GetActiveNodeCount {
        response: oneshot::Sender<u64>,
    },

    /// Aggregate statistics
    GetStats {
        response: oneshot::Sender<GridStats>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes grid messages
pub struct GridActor {
    /// The accounting engine, exclusively owned
    ledger: GridLedger,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<GridMessage>,

    /// Outbound sink for ledger events
    events: mpsc::UnboundedSender<LedgerEvent>,
}

impl GridActor {
    /// Create new actor
    pub fn new(
        ledger: GridLedger,
        mailbox: mpsc::Receiver<GridMessage>,
        events: mpsc::UnboundedSender<LedgerEvent>,
    ) -> Self {
        Self {
            ledger,
            mailbox,
            events,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if matches!(msg, GridMessage::Shutdown) {
                break;
            }
            self.handle_message(msg);
            self.forward_events();
        }
        // Deliver anything still queued before the channel drops
        self.forward_events();
    }

    /// Handle a single message to completion
    fn handle_message(&mut self, msg: GridMessage) {
        match msg {
            GridMessage::RegisterNode { id, name, response } => {
                let _ = response.send(self.ledger.register_node(id, &name));
            }

            GridMessage::RecordProduction {
                id,
                energy_amount,
                response,
            } => {
                let _ = response.send(self.ledger.record_production(&id, energy_amount));
            }

            GridMessage::Trade {
                seller,
                buyer,
                energy_amount,
                response,
            } => {
                let _ = response.send(self.ledger.trade(seller, buyer, energy_amount));
            }

            GridMessage::SetNodeActive {
                caller,
                id,
                value,
                response,
            } => {
                let _ = response.send(self.ledger.set_node_active(&caller, &id, value));
            }

            GridMessage::GetNode { id, response } => {
                let _ = response.send(self.ledger.node(&id).cloned());
            }

            GridMessage::GetTransaction { id, response } => {
                let _ = response.send(self.ledger.transaction(id).cloned());
            }

            GridMessage::GetActiveNodeCount { response } => {
                let _ = response.send(self.ledger.active_node_count());
            }

            GridMessage::GetStats { response } => {
                let _ = response.send(self.ledger.stats());
            }

            GridMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }

    /// Push drained ledger events to the sink, preserving call order
    fn forward_events(&mut self) {
        for event in self.ledger.drain_events() {
            if self.events.send(event).is_err() {
                // Sink dropped; events are fire-and-forget
                tracing::debug!("event sink closed, dropping events");
                return;
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct GridHandle {
    sender: mpsc::Sender<GridMessage>,
}

impl GridHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<GridMessage>) -> Self {
        Self { sender }
    }

    async fn call<T>(
        &self,
        msg: GridMessage,
        rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Register a new node
    pub async fn register_node(&self, id: NodeId, name: impl Into<String>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.call(
            GridMessage::RegisterNode {
                id,
                name: name.into(),
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Record claimed production; returns credits earned
    pub async fn record_production(&self, id: NodeId, energy_amount: u64) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.call(
            GridMessage::RecordProduction {
                id,
                energy_amount,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Execute a trade; returns the transaction id
    pub async fn trade(&self, seller: NodeId, buyer: NodeId, energy_amount: u64) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.call(
            GridMessage::Trade {
                seller,
                buyer,
                energy_amount,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Toggle node activation (owner-only)
    pub async fn set_node_active(&self, caller: NodeId, id: NodeId, value: bool) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.call(
            GridMessage::SetNodeActive {
                caller,
                id,
                value,
                response: tx,
            },
            rx,
        )
        .await
    }

    /// Get a node snapshot
    pub async fn get_node(&self, id: NodeId) -> Result<Node> {
        let (tx, rx) = oneshot::channel();
        self.call(GridMessage::GetNode { id, response: tx }, rx).await
    }

    /// Get a transaction record
    pub async fn get_transaction(&self, id: u64) -> Result<Transaction> {
        let (tx, rx) = oneshot::channel();
        self.call(GridMessage::GetTransaction { id, response: tx }, rx)
            .await
    }

    /// Count of currently active nodes
    pub async fn active_node_count(&self) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(GridMessage::GetActiveNodeCount { response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Aggregate statistics
    pub async fn stats(&self) -> Result<GridStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(GridMessage::GetStats { response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(GridMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the grid actor from configuration
///
/// Returns the handle and the receiving end of the event sink.
pub fn spawn_grid(config: Config) -> (GridHandle, mpsc::UnboundedReceiver<LedgerEvent>) {
    spawn_grid_with_ledger(GridLedger::new(config))
}

/// Spawn the grid actor around an existing ledger (tests, replay)
pub fn spawn_grid_with_ledger(
    ledger: GridLedger,
) -> (GridHandle, mpsc::UnboundedReceiver<LedgerEvent>) {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let actor = GridActor::new(ledger, rx, event_tx);

    tokio::spawn(async move {
        actor.run().await;
    });

    (GridHandle::new(tx), event_rx)
}
