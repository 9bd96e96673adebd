//! Weighted mixture of bivariate Gaussian components.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::gaussian::Gaussian;

/// An ordered collection of weighted Gaussian components.
///
/// The mixture itself does not enforce that weights sum to one; callers
/// that need a proper distribution use [`GaussianMixture::normalize_weights`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussianMixture {
    components: Vec<Gaussian>,
}

impl GaussianMixture {
    pub fn new(components: Vec<Gaussian>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn push(&mut self, component: Gaussian) {
        self.components.push(component);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gaussian> {
        self.components.iter()
    }

    /// Sum of component weights.
    pub fn total_weight(&self) -> f64 {
        self.components.iter().map(|g| g.weight).sum()
    }

    /// Rescale weights to sum to one. A zero-weight mixture is left as is.
    pub fn normalize_weights(&mut self) {
        let total = self.total_weight();
        if total > 0.0 {
            let inv_total = 1.0 / total;
            for component in &mut self.components {
                component.weight *= inv_total;
            }
        }
    }

    /// Mixture density at `point`.
    pub fn pdf(&self, point: DVec2) -> f64 {
        self.components
            .iter()
            .map(|g| g.weight * g.pdf(point))
            .sum()
    }

    /// Draw a sample: pick a component by weight, then sample it.
    /// Returns None for an empty or zero-weight mixture.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<DVec2> {
        let total = self.total_weight();
        if self.components.is_empty() || total <= 0.0 {
            return None;
        }

        let mut remaining = rng.gen::<f64>() * total;
        for component in &self.components {
            remaining -= component.weight;
            if remaining <= 0.0 {
                return Some(component.sample(rng));
            }
        }
        // Float rounding can leave a sliver; fall back to the last component.
        self.components.last().map(|g| g.sample(rng))
    }
}

impl std::ops::Index<usize> for GaussianMixture {
    type Output = Gaussian;

    fn index(&self, index: usize) -> &Gaussian {
        &self.components[index]
    }
}

impl<'a> IntoIterator for &'a GaussianMixture {
    type Item = &'a Gaussian;
    type IntoIter = std::slice::Iter<'a, Gaussian>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}
