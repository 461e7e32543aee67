//! Attributes that remember whether they were set explicitly.

use serde::{Deserialize, Serialize};

/// A value that is either explicitly set or falling back to a default.
///
/// An explicit empty label and an unset label read the same through
/// [`Setting::get`], but only the first one survives [`Setting::merge_from`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Setting<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explicit: Option<T>,
    #[serde(default)]
    default: T,
}

impl<T> Setting<T> {
    pub fn with_default(default: T) -> Self {
        Self {
            explicit: None,
            default,
        }
    }

    pub fn get(&self) -> &T {
        self.explicit.as_ref().unwrap_or(&self.default)
    }

    pub fn set(&mut self, value: T) {
        self.explicit = Some(value);
    }

    pub fn set_default(&mut self, value: T) {
        self.default = value;
    }

    /// Drop the explicit value so the default shows through again.
    pub fn reset(&mut self) {
        self.explicit = None;
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: Clone> Setting<T> {
    /// Copy `other`'s explicit value, if it has one.
    pub fn merge_from(&mut self, other: &Self) {
        if let Some(value) = &other.explicit {
            self.explicit = Some(value.clone());
        }
    }
}
