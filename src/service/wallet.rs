//! Wallet controller
//!
//! Connects the session to a [`BalanceFetcher`]. Actions run synchronously
//! against the session; when one of them asks for a balance refresh the
//! lookup runs as a tokio task keyed by the request it serves. A newer request
//! aborts the older task, and the session itself ignores any result that is
//! no longer current.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::blockchain::traits::BalanceFetcher;
use crate::core::errors::WalletError;
use crate::core::session::{Action, BalanceOutcome, BalanceRequest, WalletSession};

struct InFlight {
    request: BalanceRequest,
    handle: JoinHandle<BalanceOutcome>,
}

pub struct WalletController {
    session: Arc<Mutex<WalletSession>>,
    fetcher: Option<Arc<dyn BalanceFetcher>>,
    in_flight: Mutex<Option<InFlight>>,
}

impl WalletController {
    pub fn new(session: WalletSession, fetcher: Arc<dyn BalanceFetcher>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            fetcher: Some(fetcher),
            in_flight: Mutex::new(None),
        }
    }

    /// Controller that never looks up balances.
    pub fn offline(session: WalletSession) -> Self {
        Self { session: Arc::new(Mutex::new(session)), fetcher: None, in_flight: Mutex::new(None) }
    }

    /// Apply a user action. Must be called inside a tokio runtime, since a
    /// balance lookup may be spawned. Only fatal errors are returned.
    pub fn dispatch(&self, action: Action) -> Result<(), WalletError> {
        let request = self.session.lock().dispatch(action)?;
        if let Some(request) = request {
            self.spawn_fetch(request);
        }
        Ok(())
    }

    /// Ask for the primary address balance again. No-op without a wallet.
    pub fn refresh_balance(&self) {
        let request = self.session.lock().request_balance();
        if let Some(request) = request {
            self.spawn_fetch(request);
        }
    }

    fn spawn_fetch(&self, request: BalanceRequest) {
        let Some(fetcher) = self.fetcher.as_ref().map(Arc::clone) else {
            self.session.lock().cancel_balance(&request);
            return;
        };

        let mut in_flight = self.in_flight.lock();
        if let Some(previous) = in_flight.take() {
            if !previous.handle.is_finished() {
                debug!("Cancelling balance lookup for ticket {}", previous.request.ticket);
                previous.handle.abort();
            }
        }

        info!("Fetching balance via {} (ticket {})", fetcher.network_name(), request.ticket);
        let session = Arc::clone(&self.session);
        let task_request = request.clone();
        let handle = tokio::spawn(async move {
            let result = fetcher.fetch_balance(&task_request.address).await;
            session.lock().apply_balance(&task_request, result)
        });

        *in_flight = Some(InFlight { request, handle });
    }

    /// Wait for the current lookup, if any. `None` when nothing was pending or
    /// the task was cancelled.
    pub async fn settle(&self) -> Option<BalanceOutcome> {
        let in_flight = self.in_flight.lock().take()?;
        in_flight.handle.await.ok()
    }

    /// Dispatch and wait for any lookup the action started.
    pub async fn dispatch_and_settle(
        &self,
        action: Action,
    ) -> Result<Option<BalanceOutcome>, WalletError> {
        self.dispatch(action)?;
        Ok(self.settle().await)
    }

    /// The request the current lookup task serves.
    pub fn in_flight_request(&self) -> Option<BalanceRequest> {
        self.in_flight.lock().as_ref().map(|f| f.request.clone())
    }

    /// Read the session without holding the lock beyond `f`.
    pub fn with_session<R>(&self, f: impl FnOnce(&WalletSession) -> R) -> R {
        f(&self.session.lock())
    }
}
