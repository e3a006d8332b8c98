//! Single feature rows and the accessor trait used for tree traversal.

use std::ops::{Index, IndexMut};

use ndarray::ArrayView1;

use super::schema::{Feature, N_FEATURES};

/// Read access to the feature values of one sample.
///
/// Lets tree traversal work on plain slices, ndarray rows and
/// [`FeatureRecord`]s alike.
pub trait SampleAccessor {
    /// Value of the feature at `index`.
    fn feature(&self, index: usize) -> f32;
}

impl SampleAccessor for [f32] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

impl<const N: usize> SampleAccessor for [f32; N] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

impl SampleAccessor for ArrayView1<'_, f32> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

/// One row of the eight model inputs, in training column order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRecord([f32; N_FEATURES]);

impl FeatureRecord {
    /// Record with every feature set to zero.
    pub fn zeros() -> Self {
        Self([0.0; N_FEATURES])
    }

    /// Build from values already in column order.
    pub fn from_array(values: [f32; N_FEATURES]) -> Self {
        Self(values)
    }

    /// Builder-style setter.
    pub fn with(mut self, feature: Feature, value: f32) -> Self {
        self.0[feature.index()] = value;
        self
    }

    #[inline]
    pub fn get(&self, feature: Feature) -> f32 {
        self.0[feature.index()]
    }

    #[inline]
    pub fn set(&mut self, feature: Feature, value: f32) {
        self.0[feature.index()] = value;
    }

    /// Values in column order.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; N_FEATURES] {
        self.0
    }
}

impl Index<Feature> for FeatureRecord {
    type Output = f32;

    fn index(&self, feature: Feature) -> &f32 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for FeatureRecord {
    fn index_mut(&mut self, feature: Feature) -> &mut f32 {
        &mut self.0[feature.index()]
    }
}

impl SampleAccessor for FeatureRecord {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_sets_the_right_column() {
        let record = FeatureRecord::zeros()
            .with(Feature::Glucose, 150.0)
            .with(Feature::Age, 50.0);
        assert_eq!(record.as_slice(), &[0.0, 150.0, 0.0, 0.0, 0.0, 0.0, 0.0, 50.0]);
        assert_eq!(record[Feature::Glucose], 150.0);
        assert_eq!(record.feature(7), 50.0);
    }

    #[test]
    fn index_mut_updates() {
        let mut record = FeatureRecord::zeros();
        record[Feature::Bmi] = 35.0;
        assert_eq!(record.get(Feature::Bmi), 35.0);
    }
}
