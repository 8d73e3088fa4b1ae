use std::collections::BTreeMap;

use super::Element;

/// Amount of each element in a structure, weighted by site occupancy.
///
/// Elements are iterated in their canonical order (see [`Element`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composition {
    amounts: BTreeMap<Element, f64>,
}

impl Composition {
    /// Create an empty composition
    pub fn new() -> Composition {
        Composition::default()
    }

    /// Add `amount` of the given `element` to this composition
    pub fn add(&mut self, element: Element, amount: f64) {
        *self.amounts.entry(element).or_insert(0.0) += amount;
    }

    /// Get the amount of `element`, 0 if the element is not present
    pub fn amount(&self, element: Element) -> f64 {
        self.amounts.get(&element).copied().unwrap_or(0.0)
    }

    /// Total amount of all elements
    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Does this composition contain the given element?
    pub fn contains(&self, element: Element) -> bool {
        self.amounts.contains_key(&element)
    }

    /// Elements in this composition, in canonical order
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.amounts.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Get the fractional composition, where the amounts sum to 1
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn fractional(&self) -> Composition {
        let total = self.total();
        if total == 0.0 {
            return self.clone();
        }

        let amounts = self.amounts.iter()
            .map(|(&element, &amount)| (element, amount / total))
            .collect();

        return Composition { amounts };
    }
}

impl FromIterator<(Element, f64)> for Composition {
    fn from_iter<T: IntoIterator<Item = (Element, f64)>>(iter: T) -> Composition {
        let mut composition = Composition::new();
        for (element, amount) in iter {
            composition.add(element, amount);
        }
        return composition;
    }
}
