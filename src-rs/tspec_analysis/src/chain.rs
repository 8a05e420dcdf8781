//! Cycle detection for recursive resolution

/// A stack of entities currently being resolved
///
/// Pushing an entity that is already on the chain does not modify the chain;
/// instead the cycle is handed back to the caller, which decides how to
/// report it.
#[derive(Debug, Clone)]
pub struct ReferenceChain<T: PartialEq + Clone> {
    items: Vec<T>,
}

impl<T: PartialEq + Clone> Default for ReferenceChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq + Clone> ReferenceChain<T> {
    /// Creates an empty chain
    #[must_use]
    pub const fn new() -> Self {
        Self { items: vec![] }
    }

    /// Pushes an item onto the chain
    ///
    /// # Errors
    ///
    /// Returns the cycle path if `item` is already on the chain. The path
    /// starts and ends with `item`.
    pub fn push(&mut self, item: T) -> Result<(), Vec<T>> {
        match self.find_cycle(&item) {
            Some(cycle) => Err(cycle),
            None => {
                self.items.push(item);
                Ok(())
            }
        }
    }

    /// Removes and returns the innermost item
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns whether `item` is currently on the chain
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Returns the cycle `item` would close, if any
    ///
    /// The path includes every item from the first occurrence of `item` to
    /// the top of the chain, plus `item` itself at the end.
    #[must_use]
    pub fn find_cycle(&self, item: &T) -> Option<Vec<T>> {
        let position = self.items.iter().position(|i| i == item)?;

        let mut cycle = self.items[position..].to_vec();
        cycle.push(item.clone());

        Some(cycle)
    }

    /// Returns the number of entries on the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_reports_cycle_without_modifying_chain() {
        let mut chain = ReferenceChain::new();
        chain.push("a").expect("a is new");
        chain.push("b").expect("b is new");
        chain.push("c").expect("c is new");

        let cycle = chain.push("b").expect_err("b is already on the chain");

        assert_eq!(cycle, ["b", "c", "b"]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn popped_items_no_longer_form_cycles() {
        let mut chain = ReferenceChain::new();
        chain.push(1).expect("1 is new");
        assert_eq!(chain.pop(), Some(1));

        chain.push(1).expect("1 was popped");
        assert!(chain.contains(&1));
    }
}
