use crate::api::Api;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::notify::{LogNotifier, Notifier};
use crate::state::{State, StoreContext};
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type EventSender = std::sync::mpsc::Sender<NetworkEvent>;
type EventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing and state management for an embedding surface.
///
/// The embedder reads and mutates `State` on its own thread; gateway calls
/// run on a dedicated network worker that applies results back into state
/// and reports outcomes through the notification sink.
pub struct App {
    state: Arc<Mutex<State>>,
    net_sender: EventSender,
}

impl App {
    /// Start a new engine according to the given configuration. Notices are
    /// reported through the log facade.
    ///
    pub fn start(config: Config) -> AppResult<App> {
        App::start_with_notifier(config, Box::new(LogNotifier))
    }

    /// Start a new engine with a custom notification sink.
    ///
    pub fn start_with_notifier(config: Config, notifier: Box<dyn Notifier>) -> AppResult<App> {
        info!("Starting engine...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let context = match &config.default_store {
            Some(store_id) => StoreContext::new(store_id.clone()),
            None => StoreContext::default(),
        };
        let app = App {
            state: Arc::new(Mutex::new(State::new(tx.clone(), context))),
            net_sender: tx,
        };
        app.start_network(rx, config.base_url.clone(), notifier);
        app.net_sender
            .send(NetworkEvent::Bootstrap)
            .map_err(|e| AppError::WorkerStartup(e.to_string()))?;
        Ok(app)
    }

    /// Handle to the shared state.
    ///
    pub fn state(&self) -> Arc<Mutex<State>> {
        Arc::clone(&self.state)
    }

    /// Sender for queueing network events directly.
    ///
    pub fn sender(&self) -> EventSender {
        self.net_sender.clone()
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(
        &self,
        net_receiver: EventReceiver,
        base_url: String,
        mut notifier: Box<dyn Notifier>,
    ) {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    let api = Api::new(&base_url);
                    let mut network_event_handler =
                        NetworkEventHandler::new(&cloned_state, &api, notifier.as_mut());
                    while let Ok(network_event) = net_receiver.recv() {
                        match network_event_handler.handle(network_event).await {
                            Ok(_) => (),
                            Err(e) => error!("Failed to handle network event: {}", e),
                        }
                    }
                })
        });
    }
}
