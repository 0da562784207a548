//! Region statistics and the stock distance functions built on them.
//!
//! A [`MeansNode`] accumulates the sum and count of the pixel values of one
//! region. The distance functions compare two regions either by the plain
//! difference of their means or by the Haris criterion, which scales the
//! squared difference with `na*nb/(na+nb)` so that small regions are merged
//! first.

use std::ops::{Add, AddAssign, Div, Sub};

use serde::{Deserialize, Serialize};

use super::{Accumulate, WeightFn};

/// Value types a [`MeansNode`] can average.
pub trait MeanValue: Copy + Default + AddAssign + Div<f32, Output = Self> {}

impl MeanValue for f32 {}

/// RGB triple with `f32` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn norm_sqr(self) -> f32 {
        self.r * self.r + self.g * self.g + self.b * self.b
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, o: Rgb) -> Rgb {
        Rgb::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

impl Sub for Rgb {
    type Output = Rgb;
    fn sub(self, o: Rgb) -> Rgb {
        Rgb::new(self.r - o.r, self.g - o.g, self.b - o.b)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, o: Rgb) {
        *self = *self + o;
    }
}

impl Div<f32> for Rgb {
    type Output = Rgb;
    fn div(self, k: f32) -> Rgb {
        Rgb::new(self.r / k, self.g / k, self.b / k)
    }
}

impl MeanValue for Rgb {}

/// Running sum and element count of a region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeansNode<T> {
    sum: T,
    n: u32,
}

impl<T: MeanValue> MeansNode<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one element.
    pub fn consider(&mut self, elem: T) -> &mut Self {
        self.n += 1;
        self.sum += elem;
        self
    }

    /// Mean of the considered elements; `T::default()` when empty.
    pub fn mean(&self) -> T {
        if self.n == 0 {
            T::default()
        } else {
            self.sum / self.n as f32
        }
    }

    pub fn sum(&self) -> T {
        self.sum
    }

    pub fn size(&self) -> u32 {
        self.n
    }
}

impl<T: MeanValue> Accumulate for MeansNode<T> {
    fn accumulate(&mut self, other: &Self) {
        self.n += other.n;
        self.sum += other.sum;
    }
}

fn haris_factor(na: u32, nb: u32) -> f32 {
    let total = na + nb;
    if total == 0 {
        0.0
    } else {
        (na as f32 * nb as f32) / total as f32
    }
}

/// `|mean(a) - mean(b)|`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarMeanDistance;

impl WeightFn<MeansNode<f32>, u32, f32> for ScalarMeanDistance {
    fn weight(&self, a: &MeansNode<f32>, b: &MeansNode<f32>, _boundary: &u32) -> f32 {
        (a.mean() - b.mean()).abs()
    }
}

/// Haris criterion on gray values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarHarisDistance;

impl WeightFn<MeansNode<f32>, u32, f32> for ScalarHarisDistance {
    fn weight(&self, a: &MeansNode<f32>, b: &MeansNode<f32>, _boundary: &u32) -> f32 {
        let d = a.mean() - b.mean();
        haris_factor(a.size(), b.size()) * d * d
    }
}

/// Euclidean distance between the mean colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMeanDistance;

impl WeightFn<MeansNode<Rgb>, u32, f32> for ColorMeanDistance {
    fn weight(&self, a: &MeansNode<Rgb>, b: &MeansNode<Rgb>, _boundary: &u32) -> f32 {
        (a.mean() - b.mean()).norm_sqr().sqrt()
    }
}

/// Haris criterion on mean colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorHarisDistance;

impl WeightFn<MeansNode<Rgb>, u32, f32> for ColorHarisDistance {
    fn weight(&self, a: &MeansNode<Rgb>, b: &MeansNode<Rgb>, _boundary: &u32) -> f32 {
        haris_factor(a.size(), b.size()) * (a.mean() - b.mean()).norm_sqr()
    }
}
