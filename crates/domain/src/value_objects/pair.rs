use crate::enums::Side;
use serde::{Deserialize, Serialize};

/// A value held for each leg of a pool: asset ids, reserves or weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair<T> {
    pub base: T,
    pub quote: T,
}

impl<T> Pair<T> {
    pub fn new(base: T, quote: T) -> Self {
        Self { base, quote }
    }

    /// Returns the value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Base => &self.base,
            Side::Quote => &self.quote,
        }
    }

    /// Mutable access to the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Base => &mut self.base,
            Side::Quote => &mut self.quote,
        }
    }

    /// Swaps the roles of base and quote.
    #[must_use]
    pub fn swap(self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Pair<U> {
        Pair {
            base: f(self.base),
            quote: f(self.quote),
        }
    }
}

impl<T: PartialEq> Pair<T> {
    /// Finds which side holds `value`, if any.
    pub fn side_of(&self, value: &T) -> Option<Side> {
        if &self.base == value {
            Some(Side::Base)
        } else if &self.quote == value {
            Some(Side::Quote)
        } else {
            None
        }
    }
}
