//! Text feature extraction for the classifier.
//!
//! * [`TextPreprocessor`] — lowercase, split on whitespace, map words to
//!   vocabulary ids, truncate/pad to a fixed width ([`TokenSequence`]).
//! * [`ProvinceResolver`] — first alias substring match → [`ProvinceId`].
//!
//! Both are pure functions of their input text and the loaded artifacts.
//!
//! [`ProvinceId`]: crate::artifacts::ProvinceId

pub mod preprocess;
pub mod province;

pub use preprocess::{TextPreprocessor, TokenSequence};
pub use province::ProvinceResolver;
