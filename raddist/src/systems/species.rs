//! Chemical elements and (optionally charged) species.
//!
//! Sites are resolved to a [`Species`] when they are added to a system, so
//! the calculators only ever deal with a canonical [`Element`] and an
//! optional oxidation state.
use std::cmp::Ordering;
use std::str::FromStr;

use crate::Error;
use super::periodic_table::ELEMENTS;

/// A chemical element, identified by its atomic number.
///
/// Elements are ordered by increasing Pauling electronegativity (elements
/// without a tabulated value come last), with ties broken by symbol. This is
/// the order used for the element vocabulary of the partial RDF.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element(u8);

impl Element {
    /// Get the element with the given atomic number
    pub fn from_atomic_number(atomic_number: u8) -> Result<Element, Error> {
        if atomic_number == 0 || atomic_number as usize > ELEMENTS.len() {
            return Err(Error::InvalidParameter(format!(
                "{} is not a valid atomic number", atomic_number
            )));
        }
        return Ok(Element(atomic_number));
    }

    /// Get the element with the given symbol, e.g. `"Fe"`
    pub fn from_symbol(symbol: &str) -> Result<Element, Error> {
        ELEMENTS.iter()
            .position(|&(known, _)| known == symbol)
            .map(|index| Element(index as u8 + 1))
            .ok_or_else(|| Error::InvalidParameter(format!(
                "'{}' is not a known element symbol", symbol
            )))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        ELEMENTS[self.0 as usize - 1].0
    }

    /// Pauling electronegativity of this element, if known
    pub fn electronegativity(self) -> Option<f64> {
        let value = ELEMENTS[self.0 as usize - 1].1;
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Element) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Element) -> Ordering {
        let lhs = self.electronegativity().unwrap_or(f64::INFINITY);
        let rhs = other.electronegativity().unwrap_or(f64::INFINITY);
        lhs.total_cmp(&rhs).then_with(|| self.symbol().cmp(other.symbol()))
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = Error;

    fn from_str(symbol: &str) -> Result<Element, Error> {
        Element::from_symbol(symbol)
    }
}

/// The chemical species occupying a site: an element and possibly its
/// oxidation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Species {
    element: Element,
    oxidation_state: Option<f64>,
}

impl Species {
    /// Create a neutral species, without oxidation state
    pub fn new(element: Element) -> Species {
        Species {
            element: element,
            oxidation_state: None,
        }
    }

    /// Create a species with the given oxidation state
    pub fn with_oxidation_state(element: Element, oxidation_state: f64) -> Species {
        Species {
            element: element,
            oxidation_state: Some(oxidation_state),
        }
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn oxidation_state(&self) -> Option<f64> {
        self.oxidation_state
    }
}

impl From<Element> for Species {
    fn from(element: Element) -> Species {
        Species::new(element)
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element)?;
        if let Some(oxidation_state) = self.oxidation_state {
            let sign = if oxidation_state < 0.0 { '-' } else { '+' };
            write!(f, "{}{}", oxidation_state.abs(), sign)?;
        }
        Ok(())
    }
}

/// Parse species written as `"Fe"`, `"Fe3+"`, `"O2-"`, `"Na+"` or `"Fe+3"`
impl FromStr for Species {
    type Err = Error;

    fn from_str(string: &str) -> Result<Species, Error> {
        let string = string.trim();
        let split = string.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(string.len());
        let (symbol, charge) = string.split_at(split);
        let element = Element::from_symbol(symbol)?;

        if charge.is_empty() {
            return Ok(Species::new(element));
        }

        let invalid = || Error::InvalidParameter(format!(
            "invalid oxidation state in species '{}'", string
        ));

        let (magnitude, sign) = if let Some(magnitude) = charge.strip_suffix('+') {
            (magnitude, 1.0)
        } else if let Some(magnitude) = charge.strip_suffix('-') {
            (magnitude, -1.0)
        } else if let Some(magnitude) = charge.strip_prefix('+') {
            (magnitude, 1.0)
        } else if let Some(magnitude) = charge.strip_prefix('-') {
            (magnitude, -1.0)
        } else {
            return Err(invalid());
        };

        let magnitude = if magnitude.is_empty() {
            1.0
        } else {
            magnitude.parse::<f64>().map_err(|_| invalid())?
        };

        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(invalid());
        }

        return Ok(Species::with_oxidation_state(element, sign * magnitude));
    }
}
