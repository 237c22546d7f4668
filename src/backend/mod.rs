//! Real camera backends implementing the vendor seam in [`crate::device`].

pub mod nokhwa;

pub use self::nokhwa::NokhwaSdk;
