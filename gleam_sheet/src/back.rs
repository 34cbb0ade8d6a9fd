// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

use tracing::trace;

/// Platform hook that routes the system back gesture to a sheet.
///
/// The sheet only toggles registration on visibility edges; delivering the
/// gesture back to [`GleamSheet::on_back_pressed`](crate::GleamSheet::on_back_pressed)
/// is up to the host.
pub trait BackInterceptor {
    /// Starts intercepting back.
    fn register(&mut self);
    /// Stops intercepting back.
    fn unregister(&mut self);
}

/// Keeps one optional interceptor in sync with a wanted registration state.
#[derive(Default)]
pub(crate) struct BackRegistration {
    interceptor: Option<Box<dyn BackInterceptor>>,
    registered: bool,
}

impl fmt::Debug for BackRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackRegistration")
            .field("installed", &self.interceptor.is_some())
            .field("registered", &self.registered)
            .finish()
    }
}

impl BackRegistration {
    /// Replaces the interceptor, moving the registration over.
    pub(crate) fn install(&mut self, interceptor: Box<dyn BackInterceptor>) {
        let registered = self.registered;
        self.set(false);
        self.interceptor = Some(interceptor);
        self.set(registered);
    }

    pub(crate) fn is_registered(&self) -> bool {
        self.registered
    }

    /// Registers or unregisters on edges only.
    pub(crate) fn set(&mut self, wanted: bool) {
        if wanted == self.registered {
            return;
        }
        self.registered = wanted;
        if let Some(interceptor) = &mut self.interceptor {
            trace!(registered = wanted, "back interceptor toggled");
            if wanted {
                interceptor.register();
            } else {
                interceptor.unregister();
            }
        }
    }
}
