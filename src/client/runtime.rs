// ==================== CLIENT RUNTIME ====================
// Executa os efeitos produzidos por ClientState::apply: requisições viram
// tasks tokio que devolvem o resultado como evento; mensagens transitórias
// ganham um timer. Cada novo estado é publicado num canal watch.

use crate::client::{
    api::UsersApi,
    state::{ClientState, Effect, Event},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Envia intenções do usuário para o runtime.
#[derive(Clone)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl ClientHandle {
    /// Returns false once the runtime is gone.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }
}

pub struct ClientRuntime {
    state: ClientState,
    api: Arc<dyn UsersApi>,
    message_ttl: Duration,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    published: watch::Sender<ClientState>,
}

impl ClientRuntime {
    pub fn new(api: Arc<dyn UsersApi>, message_ttl: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (published, _) = watch::channel(ClientState::new());

        Self {
            state: ClientState::new(),
            api,
            message_ttl,
            events_tx,
            events_rx,
            published,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.published.subscribe()
    }

    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Applies one event, starts its effects and publishes the new state.
    pub fn dispatch(&mut self, event: Event) {
        let (next, effects) = std::mem::take(&mut self.state).apply(event);
        self.state = next;

        for effect in effects {
            self.spawn_effect(effect);
        }

        self.published.send_replace(self.state.clone());
    }

    /// Waits for the next intent or completed request and applies it.
    pub async fn step(&mut self) {
        // O runtime guarda um sender, então o canal nunca fecha
        if let Some(event) = self.events_rx.recv().await {
            self.dispatch(event);
        }
    }

    pub async fn run(mut self) {
        self.dispatch(Event::Load);
        loop {
            self.step().await;
        }
    }

    fn spawn_effect(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();

        match effect {
            Effect::Fetch { seq } => {
                tokio::spawn(async move {
                    let result = api.list().await;
                    if let Err(e) = &result {
                        log::warn!("⚠️ Error fetching users: {}", e);
                    }
                    let _ = tx.send(Event::Loaded { seq, result });
                });
            }
            Effect::Create { seq, fields } => {
                tokio::spawn(async move {
                    let result = api.create(&fields).await;
                    let _ = tx.send(Event::Created { seq, result });
                });
            }
            Effect::Update { seq, id, fields } => {
                tokio::spawn(async move {
                    let result = api.update(&id, &fields).await;
                    let _ = tx.send(Event::Updated { seq, id, result });
                });
            }
            Effect::Delete { seq, id } => {
                tokio::spawn(async move {
                    let result = api.delete(&id).await;
                    let _ = tx.send(Event::Deleted { seq, id, result });
                });
            }
            Effect::ExpireMessage(token) => {
                let ttl = self.message_ttl;
                tokio::spawn(async move {
                    tokio::time::sleep(ttl).await;
                    let _ = tx.send(Event::MessageExpired(token));
                });
            }
        }
    }
}
