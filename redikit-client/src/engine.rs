//! # Execution Engine
//!
//! Purpose: Run caller-supplied units of work against a bound connection,
//! handling acquisition, optional pipelining, and release on every exit
//! path.
//!
//! ## Design Principles
//! 1. **Release Is Unconditional**: A freshly acquired connection goes back
//!    to the factory exactly once, success or failure.
//! 2. **Ownership-Scoped Batching**: Only the call that opened a pipeline
//!    window closes and harvests it; inherited windows are left alone.
//! 3. **Context-Passed Binding**: Session reuse threads the bound connection
//!    explicitly through the call chain; there is no ambient state.
//! 4. **No Retries, No Translation**: Unit-of-work failures propagate
//!    unchanged; the engine neither retries nor reinterprets them.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use redikit_core::{Connection, ConnectionFactory, Error, Reply, Result};

use crate::guard::CloseSuppressing;

/// A connection bound to a logical session, shared by the operations issued
/// during that session.
pub(crate) type BoundConn = Mutex<Box<dyn Connection>>;

/// Connection binder plus batch controller.
pub(crate) struct Engine {
    factory: Arc<dyn ConnectionFactory>,
    expose_connection: bool,
}

impl Engine {
    pub fn new(factory: Arc<dyn ConnectionFactory>, expose_connection: bool) -> Self {
        Engine { factory, expose_connection }
    }

    /// Whether units of work receive the raw connection or the
    /// lifecycle-suppressing view.
    pub fn expose_connection(&self) -> bool {
        self.expose_connection
    }

    /// Acquires a connection for one session and wraps it for shared use.
    pub fn bind(&self) -> Result<BoundConn> {
        let connection = self.factory.get_connection()?;
        debug!("bound connection for session");
        Ok(Mutex::new(connection))
    }

    /// Releases a session-bound connection back to the factory.
    pub fn unbind(&self, bound: BoundConn) {
        let connection = bound.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.factory.release(connection);
        debug!("unbound session connection");
    }

    /// Runs `unit` on a connection: the bound one when a session is active,
    /// otherwise a fresh acquisition that is released on every exit path.
    pub fn in_connection<T>(
        &self,
        bound: Option<&BoundConn>,
        expose: bool,
        unit: impl FnOnce(&mut dyn Connection) -> Result<T>,
    ) -> Result<T> {
        match bound {
            Some(slot) => {
                trace!("reusing session-bound connection");
                let mut conn = slot.lock().expect("session connection mutex poisoned");
                run_unit(conn.as_mut(), expose, unit)
            }
            None => {
                let mut conn = self.factory.get_connection()?;
                trace!("acquired connection from factory");
                let result = run_unit(conn.as_mut(), expose, unit);
                self.factory.release(conn);
                trace!("released connection to factory");
                result
            }
        }
    }

    /// Pipelined execution. Opens a pipeline window unless one is already
    /// open; an owned window is closed and harvested here, an inherited one
    /// is left for its opener, in which case the returned sequence is empty.
    ///
    /// A unit of work that produces a direct result while this call owns the
    /// window is an invalid-usage failure: the direct value would be
    /// discarded in favor of the harvested sequence. The public
    /// `execute_pipelined` makes that unrepresentable by taking a
    /// `()`-returning unit; this checked layer keeps the contract enforced
    /// for any future caller that is not statically constrained.
    pub fn pipelined_checked<T>(
        &self,
        bound: Option<&BoundConn>,
        expose: bool,
        unit: impl FnOnce(&mut dyn Connection) -> Result<Option<T>>,
    ) -> Result<Vec<Reply>> {
        self.in_connection(bound, true, |conn| {
            let inherited = conn.is_pipelined();
            if !inherited {
                conn.open_pipeline()?;
                debug!("opened pipeline window");
            }

            let outcome = run_unit(&mut *conn, expose, unit);

            if inherited {
                // The enclosing opener harvests; any direct result belongs
                // to the caller's own plumbing and is dropped here.
                return outcome.map(|_| Vec::new());
            }

            match outcome {
                Ok(None) => {
                    let replies = conn.close_pipeline()?;
                    debug!(replies = replies.len(), "closed pipeline window");
                    Ok(replies)
                }
                Ok(Some(_)) => {
                    // Balance the window before surfacing the usage error.
                    let _ = conn.close_pipeline();
                    Err(Error::InvalidUsage(
                        "unit of work must not return a direct result while it owns an open pipeline"
                            .into(),
                    ))
                }
                Err(err) => {
                    let _ = conn.close_pipeline();
                    Err(err)
                }
            }
        })
    }
}

/// Hands the unit of work either the raw connection or the
/// lifecycle-suppressing view.
fn run_unit<T>(
    conn: &mut dyn Connection,
    expose: bool,
    unit: impl FnOnce(&mut dyn Connection) -> Result<T>,
) -> Result<T> {
    if expose {
        unit(conn)
    } else {
        let mut view = CloseSuppressing::new(conn);
        unit(&mut view)
    }
}
