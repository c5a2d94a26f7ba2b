use crate::domain::errors::PredictionError;
use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Map, Value};

/// Number of features the risk model consumes.
pub const FEATURE_COUNT: usize = 21;

/// Numeric type a feature is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Binary indicator or small ordinal code.
    Integer,
    /// Continuous value (body-mass index).
    Float,
}

/// Ordered list of feature names.
/// This order MUST match exactly with the order used when the model was trained.
/// Any change here is a breaking change for every model artifact.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "highBP",
    "highChol",
    "cholCheck",
    "bmi",
    "smoker",
    "stroke",
    "heartDiseaseorAttack",
    "physActivity",
    "fruits",
    "veggies",
    "hvyAlcoholConsump",
    "anyHealthcare",
    "noDocbcCost",
    "genHlth",
    "mentHlth",
    "physHlth",
    "diffWalk",
    "sex",
    "age",
    "education",
    "income",
];

/// Kind of each feature, indexed like [`FEATURE_NAMES`].
pub fn feature_kind(index: usize) -> FeatureKind {
    if FEATURE_NAMES[index] == "bmi" {
        FeatureKind::Float
    } else {
        FeatureKind::Integer
    }
}

/// A single coerced feature value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            FeatureValue::Int(v) => *v as f64,
            FeatureValue::Float(v) => *v,
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Int(v) => serializer.serialize_i64(*v),
            FeatureValue::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

/// One validated health-survey record.
///
/// Values are stored in model order, so assembling the feature vector is a
/// straight copy and cannot reorder fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: [FeatureValue; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Coerce a JSON object into a record.
    ///
    /// Integer fields accept integers, integral floats and numeric strings.
    /// `bmi` accepts any finite number. Unknown keys are ignored.
    pub fn from_json(payload: &Value) -> Result<Self, PredictionError> {
        let object = payload.as_object().ok_or_else(|| {
            PredictionError::BadInput("request body must be a JSON object".to_string())
        })?;
        Self::from_map(object)
    }

    pub fn from_map(object: &Map<String, Value>) -> Result<Self, PredictionError> {
        let mut values = [FeatureValue::Int(0); FEATURE_COUNT];
        for (index, name) in FEATURE_NAMES.iter().enumerate() {
            let raw = object
                .get(*name)
                .ok_or_else(|| PredictionError::BadInput(format!("{name}: field required")))?;
            values[index] = coerce(name, feature_kind(index), raw)?;
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|index| self.values[index])
    }

    /// Feature vector in training order.
    pub fn to_vector(&self) -> Vec<f64> {
        self.values.iter().map(FeatureValue::as_f64).collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in FEATURE_NAMES.iter().zip(self.values.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn coerce(name: &str, kind: FeatureKind, raw: &Value) -> Result<FeatureValue, PredictionError> {
    let number = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(match kind {
                    FeatureKind::Integer => FeatureValue::Int(i),
                    FeatureKind::Float => FeatureValue::Float(i as f64),
                });
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => {
            return Err(PredictionError::BadInput(format!(
                "{name}: value must not be null"
            )));
        }
        _ => None,
    };

    let number = number
        .filter(|v| v.is_finite())
        .ok_or_else(|| PredictionError::BadInput(format!("{name}: expected a number")))?;

    match kind {
        FeatureKind::Float => Ok(FeatureValue::Float(number)),
        FeatureKind::Integer => {
            if number.fract() != 0.0 || number.abs() > i64::MAX as f64 {
                return Err(PredictionError::BadInput(format!(
                    "{name}: expected an integer, got {number}"
                )));
            }
            Ok(FeatureValue::Int(number as i64))
        }
    }
}
