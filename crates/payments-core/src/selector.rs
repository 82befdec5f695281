//! # Method Selector
//!
//! Tracks which payment methods are offered and which one the customer
//! picked. With a single offered method the choice is made automatically
//! and the selector step disappears from the UI.

use crate::error::{CheckoutError, CheckoutResult};
use crate::method::PaymentMethodType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSelector {
    available: Vec<PaymentMethodType>,
    selected: Option<PaymentMethodType>,
}

impl MethodSelector {
    /// Create a selector; auto-selects when exactly one method is offered
    pub fn new(methods: impl IntoIterator<Item = PaymentMethodType>) -> Self {
        let mut selector = Self {
            available: Vec::new(),
            selected: None,
        };
        selector.set_available(methods);
        selector
    }

    /// Replace the offered methods (order kept, duplicates dropped).
    ///
    /// Drops a selection that is no longer offered and re-applies the
    /// single-method rule. Returns the method that became selected, if any.
    pub fn set_available(
        &mut self,
        methods: impl IntoIterator<Item = PaymentMethodType>,
    ) -> Option<PaymentMethodType> {
        let before = self.selected;

        self.available.clear();
        for method in methods {
            if !self.available.contains(&method) {
                self.available.push(method);
            }
        }

        if let Some(current) = self.selected {
            if !self.available.contains(&current) {
                self.selected = None;
            }
        }
        if let [only] = self.available.as_slice() {
            self.selected = Some(*only);
        }

        if self.selected != before {
            self.selected
        } else {
            None
        }
    }

    /// Pick a method; it must be one of the offered ones
    pub fn select(&mut self, method: PaymentMethodType) -> CheckoutResult<()> {
        if !self.is_available(method) {
            return Err(CheckoutError::MethodUnavailable(method));
        }
        self.selected = Some(method);
        Ok(())
    }

    pub fn selected(&self) -> Option<PaymentMethodType> {
        self.selected
    }

    pub fn available(&self) -> &[PaymentMethodType] {
        &self.available
    }

    pub fn is_available(&self, method: PaymentMethodType) -> bool {
        self.available.contains(&method)
    }

    /// True when exactly one method is offered
    pub fn is_single_method(&self) -> bool {
        self.available.len() == 1
    }

    /// Whether the selector UI should be rendered at all
    pub fn should_render(&self, show_method_selector: bool) -> bool {
        show_method_selector && self.available.len() > 1
    }
}

impl Default for MethodSelector {
    fn default() -> Self {
        Self::new(PaymentMethodType::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PaymentMethodType::*;

    #[test]
    fn test_default_has_no_selection() {
        let selector = MethodSelector::default();
        assert_eq!(selector.available(), &[Card, Pse, Cash]);
        assert_eq!(selector.selected(), None);
        assert!(selector.should_render(true));
        assert!(!selector.should_render(false));
    }

    #[test]
    fn test_single_method_auto_selected() {
        let selector = MethodSelector::new([Pse]);
        assert_eq!(selector.selected(), Some(Pse));
        assert!(selector.is_single_method());
        assert!(!selector.should_render(true));
    }

    #[test]
    fn test_duplicates_collapse_to_single() {
        let selector = MethodSelector::new([Cash, Cash]);
        assert_eq!(selector.available(), &[Cash]);
        assert_eq!(selector.selected(), Some(Cash));
    }

    #[test]
    fn test_select_unavailable() {
        let mut selector = MethodSelector::new([Card, Pse]);
        assert!(matches!(
            selector.select(Cash),
            Err(CheckoutError::MethodUnavailable(Cash))
        ));
        selector.select(Pse).unwrap();
        assert_eq!(selector.selected(), Some(Pse));
    }

    #[test]
    fn test_reconfigure() {
        let mut selector = MethodSelector::new([Card, Pse, Cash]);
        selector.select(Cash).unwrap();

        // Still offered: selection kept
        assert_eq!(selector.set_available([Card, Cash]), None);
        assert_eq!(selector.selected(), Some(Cash));

        // No longer offered: cleared
        assert_eq!(selector.set_available([Card, Pse]), None);
        assert_eq!(selector.selected(), None);

        // Narrowed to one: forced
        assert_eq!(selector.set_available([Card]), Some(Card));
        assert_eq!(selector.selected(), Some(Card));
    }
}
