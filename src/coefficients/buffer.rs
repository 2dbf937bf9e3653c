pub use std::ops::Deref;

/// Read-only slice access plus `Vec<f64>` conversions for a validated
/// coefficient vector stored in `buffer: Box<[f64]>`.
///
/// There is no `DerefMut`; `TryFrom<Vec<f64>>` goes through the type's `new`.
macro_rules! coefficient_buffer {
    ($t:ty) => {
        impl Deref for $t {
            type Target = [f64];

            fn deref(&self) -> &Self::Target {
                &self.buffer
            }
        }

        impl From<$t> for Vec<f64> {
            fn from(value: $t) -> Self {
                value.buffer.into_vec()
            }
        }

        impl TryFrom<Vec<f64>> for $t {
            type Error = CoefficientError;

            fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
                <$t>::new(&value)
            }
        }
    };
}
