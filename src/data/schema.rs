//! Column schema of the Pima diabetes table.
//!
//! The column order here is the order the forest is trained on. Predictions must
//! use the same order, so every conversion into a feature vector goes through
//! [`Feature::ALL`] rather than through the key order of some input mapping.

/// Number of feature columns.
pub const N_FEATURES: usize = 8;

/// Name of the label column in the CSV source.
pub const LABEL_COLUMN: &str = "Outcome";

/// A feature column.
///
/// The discriminant is the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Feature {
    Pregnancies = 0,
    Glucose = 1,
    BloodPressure = 2,
    SkinThickness = 3,
    Insulin = 4,
    Bmi = 5,
    DiabetesPedigreeFunction = 6,
    Age = 7,
}

impl Feature {
    /// All features in training column order.
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Columns where a recorded `0` means "not measured".
    pub const NULLABLE: [Feature; 5] = [
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
    ];

    /// Column index in the feature matrix.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as used in the dataset and in the artifacts.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    /// Lower-camel key used by the predictor's JSON input.
    pub fn input_key(self) -> &'static str {
        match self {
            Feature::Pregnancies => "pregnancies",
            Feature::Glucose => "glucose",
            Feature::BloodPressure => "bloodPressure",
            Feature::SkinThickness => "skinThickness",
            Feature::Insulin => "insulin",
            Feature::Bmi => "bmi",
            Feature::DiabetesPedigreeFunction => "diabetesPedigreeFunction",
            Feature::Age => "age",
        }
    }

    /// Whether a `0` in this column is a missing measurement.
    #[inline]
    pub fn is_nullable(self) -> bool {
        Self::NULLABLE.contains(&self)
    }

    /// Look up a feature by its column name.
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

/// Column names in training order.
pub fn feature_names() -> Vec<String> {
    Feature::ALL
        .iter()
        .map(|f| f.column_name().to_string())
        .collect()
}
