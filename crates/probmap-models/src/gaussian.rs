//! Weighted bivariate Gaussian component.
//!
//! The CDF is the workhorse: the mixture rasterizer turns rectangle
//! probability masses into four corner CDF evaluations, so `cdf` must be
//! accurate and cheap. Uncorrelated covariances reduce to a product of
//! marginals; correlated ones go through Drezner-style quadrature over
//! the correlation parameter.

use glam::{DMat2, DVec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a model component.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Covariance matrix is not symmetric positive-definite.
    #[error("invalid covariance matrix: {reason}")]
    InvalidCovariance { reason: String },
}

/// Correlations below this magnitude are treated as zero.
const RHO_EPSILON: f64 = 1e-12;

/// 16-point Gauss–Legendre abscissae on [-1, 1] (positive half).
const GL_NODES: [f64; 8] = [
    0.095_012_509_837_637_44,
    0.281_603_550_779_258_9,
    0.458_016_777_657_227_4,
    0.617_876_244_402_643_8,
    0.755_404_408_355_003,
    0.865_631_202_387_831_8,
    0.944_575_023_073_232_6,
    0.989_400_934_991_649_9,
];

/// 16-point Gauss–Legendre weights matching [`GL_NODES`].
const GL_WEIGHTS: [f64; 8] = [
    0.189_450_610_455_068_5,
    0.182_603_415_044_923_6,
    0.169_156_519_395_002_5,
    0.149_595_988_816_576_7,
    0.124_628_971_255_533_9,
    0.095_158_511_682_492_8,
    0.062_253_523_938_647_9,
    0.027_152_459_411_754_1,
];

/// A weighted bivariate Gaussian distribution over the local metric frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    /// Distribution mean (east, north) in meters.
    pub mean: DVec2,
    /// 2x2 covariance matrix in meters squared.
    pub covariance: DMat2,
    /// Mixture weight of this component.
    pub weight: f64,
}

impl Gaussian {
    /// Create a component, validating the covariance matrix.
    ///
    /// The covariance must be symmetric positive-definite; anything else
    /// is rejected at construction rather than producing NaN probabilities
    /// later.
    pub fn new(mean: DVec2, covariance: DMat2, weight: f64) -> Result<Self, ModelError> {
        let c = &covariance;
        if (c.col(0).y - c.col(1).x).abs() > 1e-9 * c.col(0).y.abs().max(1.0) {
            return Err(ModelError::InvalidCovariance {
                reason: format!("not symmetric: {} vs {}", c.col(0).y, c.col(1).x),
            });
        }
        if c.col(0).x <= 0.0 || c.col(1).y <= 0.0 || covariance.determinant() <= 0.0 {
            return Err(ModelError::InvalidCovariance {
                reason: format!("not positive-definite: determinant {}", c.determinant()),
            });
        }
        Ok(Self {
            mean,
            covariance,
            weight,
        })
    }

    /// Axis-aligned component from per-axis standard deviations.
    pub fn axis_aligned(
        mean: DVec2,
        sigma_east: f64,
        sigma_north: f64,
        weight: f64,
    ) -> Result<Self, ModelError> {
        Self::new(
            mean,
            DMat2::from_cols(
                DVec2::new(sigma_east * sigma_east, 0.0),
                DVec2::new(0.0, sigma_north * sigma_north),
            ),
            weight,
        )
    }

    /// Correlation coefficient implied by the covariance matrix.
    pub fn correlation(&self) -> f64 {
        let c = &self.covariance;
        c.col(1).x / (c.col(0).x.sqrt() * c.col(1).y.sqrt())
    }

    /// Joint CDF: probability mass at or below `point` in both axes.
    pub fn cdf(&self, point: DVec2) -> f64 {
        let sx = self.covariance.col(0).x.sqrt();
        let sy = self.covariance.col(1).y.sqrt();
        let h = (point.x - self.mean.x) / sx;
        let k = (point.y - self.mean.y) / sy;
        let rho = self.correlation();

        if rho.abs() < RHO_EPSILON {
            return phi(h) * phi(k);
        }
        bivariate_phi(h, k, rho)
    }

    /// Probability density at `point`.
    pub fn pdf(&self, point: DVec2) -> f64 {
        let det = self.covariance.determinant();
        let d = point - self.mean;
        let solved = self.covariance.inverse() * d;
        let quad = d.dot(solved);
        (-0.5 * quad).exp() / (std::f64::consts::TAU * det.sqrt())
    }

    /// Draw a sample using the Cholesky factor of the covariance.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        let c = &self.covariance;
        let l11 = c.col(0).x.sqrt();
        let l21 = c.col(1).x / l11;
        let l22 = (c.col(1).y - l21 * l21).sqrt();

        let z1 = random_normal(rng);
        let z2 = random_normal(rng);
        DVec2::new(
            self.mean.x + l11 * z1,
            self.mean.y + l21 * z1 + l22 * z2,
        )
    }
}

/// Standard normal CDF.
pub fn phi(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function.
///
/// Rational Chebyshev approximation, absolute error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let ans = t
        * (-z * z - 1.265_512_23
            + t * (1.000_023_68
                + t * (0.374_091_96
                    + t * (0.096_784_18
                        + t * (-0.186_288_06
                            + t * (0.278_868_07
                                + t * (-1.135_203_98
                                    + t * (1.488_515_87
                                        + t * (-0.822_152_23 + t * 0.170_872_77)))))))))
        .exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Standard bivariate normal CDF with correlation `rho`.
///
/// Integrates Plackett's identity dPhi2/drho from 0 to rho with
/// 16-point Gauss–Legendre quadrature:
/// Phi2(h, k, rho) = Phi(h) Phi(k) + (1/2pi) ∫0..rho f(h, k, r) dr.
fn bivariate_phi(h: f64, k: f64, rho: f64) -> f64 {
    let integrand = |r: f64| -> f64 {
        let one_minus = 1.0 - r * r;
        ((-(h * h - 2.0 * h * k * r + k * k) / (2.0 * one_minus)).exp()) / one_minus.sqrt()
    };

    let half = rho / 2.0;
    let mut integral = 0.0;
    for (&node, &weight) in GL_NODES.iter().zip(GL_WEIGHTS.iter()) {
        integral += weight * integrand(half + half * node);
        integral += weight * integrand(half - half * node);
    }
    integral *= half;

    (phi(h) * phi(k) + integral / std::f64::consts::TAU).clamp(0.0, 1.0)
}

/// Draw from the standard normal via Box–Muller.
fn random_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    let radius = (-2.0 * u1.ln()).sqrt();
    let theta = std::f64::consts::TAU * u2;
    radius * theta.cos()
}
