/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Pair of state views handed to a state transition engine for one execution.

use super::StateView;

/// DualState holds the public view and the effective private view of one execution.
///
/// For a non-private execution there is no separate private view: [DualState::private]
/// returns the public view, so every effect lands in public state.
pub struct DualState<'a> {
    public: &'a mut dyn StateView,
    private: Option<&'a mut dyn StateView>,
}

impl<'a> DualState<'a> {
    /// Pair with a dedicated private view.
    pub fn new(public: &'a mut dyn StateView, private: &'a mut dyn StateView) -> Self {
        Self {
            public,
            private: Some(private),
        }
    }

    /// Pair whose private view is the public view.
    pub fn aliased(public: &'a mut dyn StateView) -> Self {
        Self {
            public,
            private: None,
        }
    }

    /// Selects the effective private view by the privacy flag of a message.
    pub fn select(
        public: &'a mut dyn StateView,
        private: &'a mut dyn StateView,
        is_private: bool,
    ) -> Self {
        if is_private {
            Self::new(public, private)
        } else {
            Self::aliased(public)
        }
    }

    /// Whether the private view is the public view.
    pub fn is_aliased(&self) -> bool {
        self.private.is_none()
    }

    pub fn public(&self) -> &dyn StateView {
        &*self.public
    }

    pub fn public_mut(&mut self) -> &mut dyn StateView {
        &mut *self.public
    }

    pub fn private(&self) -> &dyn StateView {
        match &self.private {
            Some(private) => &**private,
            None => &*self.public,
        }
    }

    pub fn private_mut(&mut self) -> &mut dyn StateView {
        match &mut self.private {
            Some(private) => &mut **private,
            None => &mut *self.public,
        }
    }
}
