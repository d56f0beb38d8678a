//! Cart Session
//!
//! Owns the choice of backend. Signing in moves the guest cart into the account's
//! cart with a single merge request; signing out goes back to the guest cart.

use std::{fmt, sync::Arc};

use tracing::{info, warn};

use crate::{
    backend::{AccountBackend, CartBackend, GuestBackend},
    error::CartError,
    state::CartState,
    view::CartView,
};

/// Where the session is in the sign-in lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Visitor; the guest cart is authoritative.
    Unauthenticated,

    /// Signed in, guest cart not yet reconciled.
    TransitioningToAuthenticated,

    /// Signed in; the account's cart is authoritative.
    Authenticated,
}

/// The active cart backend and the state container mirroring it.
pub struct CartSession {
    guest: Arc<GuestBackend>,
    active: Arc<dyn CartBackend>,
    phase: SessionPhase,
    state: Arc<CartState>,
}

impl fmt::Debug for CartSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSession")
            .field("guest", &self.guest)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// A visitor session backed by the guest cart.
    pub fn new(guest: Arc<GuestBackend>, state: Arc<CartState>) -> Self {
        Self {
            active: guest.clone(),
            guest,
            phase: SessionPhase::Unauthenticated,
            state,
        }
    }

    /// A session for an account that signed in earlier. No merge runs.
    pub fn resume<A>(guest: Arc<GuestBackend>, account: Arc<A>, state: Arc<CartState>) -> Self
    where
        A: AccountBackend + 'static,
    {
        Self {
            active: account,
            guest,
            phase: SessionPhase::Authenticated,
            state,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The state container fed by this session.
    pub fn state(&self) -> &Arc<CartState> {
        &self.state
    }

    /// Backend every cart operation should go to.
    pub fn backend(&self) -> Arc<dyn CartBackend> {
        self.active.clone()
    }

    /// Fetch the cart from the active backend into the state container.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, which is also recorded in the container.
    pub async fn refresh(&self) -> Result<CartView, CartError> {
        self.state.dispatch(self.active.get()).await
    }

    /// Switch to `account`, folding the guest cart into it.
    ///
    /// An empty guest cart costs no request at all and yields `None`; call
    /// [`refresh`](Self::refresh) to load the account's cart. A non-empty one is sent in a
    /// single merge request and cleared locally once that succeeds. A failed merge is not
    /// retried: the error lands in the state container, the guest cart stays where it is
    /// and the session is signed in anyway.
    ///
    /// # Errors
    ///
    /// Returns the error of the merge request.
    pub async fn sign_in<A>(&mut self, account: Arc<A>) -> Result<Option<CartView>, CartError>
    where
        A: AccountBackend + 'static,
    {
        self.phase = SessionPhase::TransitioningToAuthenticated;

        let guest_cart = match self.guest.get().await {
            Ok(cart) => cart,
            Err(error) => {
                warn!(code = %error.code, "could not read guest cart, nothing to merge");

                CartView::empty(0)
            }
        };

        let result = if guest_cart.is_empty() {
            info!("guest cart empty, nothing to merge");

            Ok(None)
        } else {
            let lines = guest_cart.items.len();
            let result = self.state.dispatch(account.merge_guest(&guest_cart.items)).await;

            match &result {
                Ok(_) => {
                    info!(lines, "guest cart merged into account cart");

                    if let Err(error) = self.guest.clear().await {
                        warn!(code = %error.code, "merged guest cart could not be cleared");
                    }
                }
                Err(error) => {
                    warn!(lines, code = %error.code, "guest cart merge failed");
                }
            }

            result.map(Some)
        };

        self.active = account;
        self.phase = SessionPhase::Authenticated;

        result
    }

    /// Drop the account's cart and go back to the guest cart.
    ///
    /// # Errors
    ///
    /// Returns the guest backend's error, which is also recorded in the container.
    pub async fn sign_out(&mut self) -> Result<CartView, CartError> {
        self.phase = SessionPhase::Unauthenticated;
        self.active = self.guest.clone();
        self.state.reset();

        info!("signed out, using the guest cart");

        self.state.dispatch(self.guest.get()).await
    }
}
