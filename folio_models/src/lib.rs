use std::ops::Deref;

use macros::sensitive_debug;
use serde::{Deserialize, Serialize};

pub mod contact;
pub mod email_address;
mod macros;

/// Wrapper for values that must never show up in logs.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(pub T);
sensitive_debug!(Sensitive<T>);
impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}
impl<T> Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
