// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition handles: the single in-flight operation slot of a sheet.
//!
//! Every call that moves a [`GleamState`](crate::GleamState) returns a
//! [`Transition`]. The state keeps one clone of the running handle; starting a
//! new transition resolves the old one as [`TransitionStatus::Cancelled`]
//! rather than dropping it silently.
//!
//! Hosts without an executor poll [`Transition::status`]. Hosts with one can
//! `.await` the handle: it resolves to `Ok(())` when the transition completed
//! (or was vetoed) and to `Err(Cancelled)` when it was superseded.
//!
//! ```
//! use core::future::Future;
//! use core::pin::pin;
//! use core::task::{Context, Poll, Waker};
//! use gleam_sheet::{GleamState, GleamValue};
//!
//! let mut state = GleamState::builder().build().unwrap();
//! state.layout(800.0, 300.0);
//!
//! let expand = state.expand();
//! let hide = state.hide().unwrap();
//!
//! // Expanding was superseded by hiding.
//! let mut cx = Context::from_waker(Waker::noop());
//! assert!(matches!(pin!(expand).poll(&mut cx), Poll::Ready(Err(_))));
//! assert_eq!(hide.target(), GleamValue::Hidden);
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use thiserror::Error;

use crate::GleamValue;

/// Lifecycle of a [`Transition`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionStatus {
    /// Still animating, or waiting for the first layout.
    Running,
    /// Arrived at the target.
    Completed,
    /// Blocked by `confirm_value_change`; nothing moved.
    Vetoed,
    /// Superseded by a newer transition, snap, or drag.
    Cancelled,
}

impl TransitionStatus {
    /// Returns `true` for every status except [`TransitionStatus::Running`].
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Error output of a superseded transition.
///
/// Callers that replace their own transitions should treat this as expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("transition to {target} was cancelled by a newer operation")]
pub struct Cancelled {
    /// The value the cancelled transition was heading to.
    pub target: GleamValue,
}

#[derive(Debug)]
struct Slot {
    target: GleamValue,
    status: TransitionStatus,
    waker: Option<Waker>,
}

/// Handle to one transition of a sheet.
///
/// Clones share the same underlying slot, including the target: a pending
/// `show()` that is resolved by a later layout pass updates every clone.
#[derive(Clone)]
pub struct Transition {
    slot: Rc<RefCell<Slot>>,
}

impl Transition {
    pub(crate) fn running(target: GleamValue) -> Self {
        Self::with_status(target, TransitionStatus::Running)
    }

    pub(crate) fn with_status(target: GleamValue, status: TransitionStatus) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                target,
                status,
                waker: None,
            })),
        }
    }

    /// The value this transition heads to.
    #[must_use]
    pub fn target(&self) -> GleamValue {
        self.slot.borrow().target
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> TransitionStatus {
        self.slot.borrow().status
    }

    /// Returns `true` once the transition is no longer running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    /// Returns `true` if both handles refer to the same transition.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    pub(crate) fn retarget(&self, target: GleamValue) {
        self.slot.borrow_mut().target = target;
    }

    /// Resolves a running transition. Later resolutions are ignored.
    pub(crate) fn resolve(&self, status: TransitionStatus) {
        let waker = {
            let mut slot = self.slot.borrow_mut();
            if slot.status.is_finished() {
                return;
            }
            slot.status = status;
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target())
            .field("status", &self.status())
            .finish()
    }
}

impl Future for Transition {
    type Output = Result<(), Cancelled>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.status {
            TransitionStatus::Running => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
            TransitionStatus::Completed | TransitionStatus::Vetoed => Poll::Ready(Ok(())),
            TransitionStatus::Cancelled => Poll::Ready(Err(Cancelled {
                target: slot.target,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::task::Wake;
    use core::future::Future;
    use core::pin::pin;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use core::task::{Context, Poll, Waker};

    use super::{Cancelled, Transition, TransitionStatus};
    use crate::GleamValue;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn first_resolution_wins() {
        let t = Transition::running(GleamValue::Expanded);
        t.resolve(TransitionStatus::Cancelled);
        t.resolve(TransitionStatus::Completed);
        assert_eq!(t.status(), TransitionStatus::Cancelled);
    }

    #[test]
    fn pending_poll_is_woken_on_resolve() {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        let mut cx = Context::from_waker(&waker);

        let t = Transition::running(GleamValue::Hidden);
        let observer = t.clone();
        let mut fut = pin!(t);
        assert!(fut.as_mut().poll(&mut cx).is_pending());

        observer.resolve(TransitionStatus::Completed);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(fut.poll(&mut cx), Poll::Ready(Ok(())));
    }

    #[test]
    fn cancelled_resolves_to_error_and_vetoed_to_ok() {
        let mut cx = Context::from_waker(Waker::noop());

        let cancelled = Transition::with_status(GleamValue::Expanded, TransitionStatus::Cancelled);
        assert_eq!(
            pin!(cancelled).poll(&mut cx),
            Poll::Ready(Err(Cancelled {
                target: GleamValue::Expanded
            }))
        );

        let vetoed = Transition::with_status(GleamValue::Hidden, TransitionStatus::Vetoed);
        assert_eq!(pin!(vetoed).poll(&mut cx), Poll::Ready(Ok(())));
    }

    #[test]
    fn clones_share_a_slot() {
        let a = Transition::running(GleamValue::Expanded);
        let b = a.clone();
        let c = Transition::running(GleamValue::Expanded);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }
}
