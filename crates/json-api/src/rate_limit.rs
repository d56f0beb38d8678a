//! Fixed-window rate limiting for cart operations.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use rustc_hash::FxHashMap;
use salvo::{
    http::header::RETRY_AFTER,
    prelude::{Depot, FlowCtrl, Request, Response, handler},
};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::{errors::ApiError, observability, state::State};

/// Windows are swept for expired entries once the table grows past this size.
const SWEEP_THRESHOLD: usize = 10_000;

/// Cart operations with independent budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CartOperation {
    Read,
    Add,
    Update,
    Remove,
    Merge,
}

impl CartOperation {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Merge => "merge",
        }
    }
}

/// Requests allowed per window for each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateLimits {
    pub(crate) window: Duration,
    pub(crate) read: u32,
    pub(crate) add: u32,
    pub(crate) update: u32,
    pub(crate) remove: u32,
    pub(crate) merge: u32,
}

impl RateLimits {
    fn budget(&self, operation: CartOperation) -> u32 {
        match operation {
            CartOperation::Read => self.read,
            CartOperation::Add => self.add,
            CartOperation::Update => self.update,
            CartOperation::Remove => self.remove,
            CartOperation::Merge => self.merge,
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            read: 100,
            add: 30,
            update: 60,
            remove: 30,
            merge: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// The budget for the current window is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateLimited {
    pub(crate) retry_after: Duration,
}

/// Per client and operation request counters.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    limits: RateLimits,
    windows: Mutex<FxHashMap<(CartOperation, String), Window>>,
}

impl RateLimiter {
    pub(crate) fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            windows: Mutex::new(FxHashMap::default()),
        }
    }

    /// Count one request from `client`, failing once the window's budget is used up.
    pub(crate) async fn check(
        &self,
        operation: CartOperation,
        client: &str,
    ) -> Result<(), RateLimited> {
        self.check_at(operation, client, Instant::now()).await
    }

    async fn check_at(
        &self,
        operation: CartOperation,
        client: &str,
        now: Instant,
    ) -> Result<(), RateLimited> {
        let window = self.limits.window;
        let budget = self.limits.budget(operation);
        let mut windows = self.windows.lock().await;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, entry| now.saturating_duration_since(entry.started) < window);
        }

        let entry = windows
            .entry((operation, client.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.saturating_duration_since(entry.started);

        if elapsed >= window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= budget {
            return Err(RateLimited {
                retry_after: window.saturating_sub(now.saturating_duration_since(entry.started)),
            });
        }

        entry.count += 1;

        Ok(())
    }
}

/// Hoop that rejects a request with 429 once its operation's budget is spent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limit(CartOperation);

pub(crate) fn limit(operation: CartOperation) -> Limit {
    Limit(operation)
}

#[handler]
impl Limit {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let Ok(state) = depot.obtain::<Arc<State>>() else {
            error!("application state missing from depot");

            res.render(ApiError::internal());
            ctrl.skip_rest();

            return;
        };

        let client = client_key(req);
        let operation = self.0;

        if let Err(limited) = state.rate_limiter.check(operation, &client).await {
            warn!(
                operation = operation.as_str(),
                client = %client,
                "rate limit exceeded"
            );

            observability::observe_rate_limited(operation.as_str());

            let retry_after = limited.retry_after.as_secs().max(1);

            if let Err(source) = res.add_header(RETRY_AFTER, retry_after, true) {
                warn!("failed to set retry-after header: {source}");
            }

            res.render(ApiError::rate_limited());
            ctrl.skip_rest();

            return;
        }

        ctrl.call_next(req, depot, res).await;
    }
}

/// Counters are keyed by the peer's IP; ports change from one connection to the next.
fn client_key(req: &Request) -> String {
    let addr = req.remote_addr();

    if let Some(v4) = addr.as_ipv4() {
        return v4.ip().to_string();
    }

    if let Some(v6) = addr.as_ipv6() {
        return v6.ip().to_string();
    }

    addr.to_string()
}
