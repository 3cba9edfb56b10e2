//! Inference engines that narrow the domains of a [Store](crate::core::Store).

pub mod cp;
