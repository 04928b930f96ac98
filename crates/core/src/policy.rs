//! Field rules that differ between deployments.
//!
//! Two rule sets are in use: a tight horsepower window with non-blank
//! descriptions, and a wide window that accepts blank descriptions. Both are
//! offered as named presets so callers choose explicitly.

/// Inclusive `[min, max]` window for `horse_powers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorsePowerBounds {
    min: i64,
    max: i64,
}

impl HorsePowerBounds {
    /// Returns `None` when `min > max`.
    pub fn new(min: i64, max: i64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Rules for the optional `problem_description` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionPolicy {
    pub allow_null: bool,
    pub allow_blank: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarPolicy {
    pub horse_powers: HorsePowerBounds,
    pub description: DescriptionPolicy,
    /// Strip leading/trailing whitespace from text fields before checking them.
    pub trim_whitespace: bool,
}

impl CarPolicy {
    /// 20..=100 hp, descriptions may be null but not blank.
    pub fn strict() -> Self {
        Self {
            horse_powers: HorsePowerBounds { min: 20, max: 100 },
            description: DescriptionPolicy {
                allow_null: true,
                allow_blank: false,
            },
            trim_whitespace: true,
        }
    }

    /// 1..=1914 hp, descriptions may be null or blank.
    pub fn permissive() -> Self {
        Self {
            horse_powers: HorsePowerBounds { min: 1, max: 1914 },
            description: DescriptionPolicy {
                allow_null: true,
                allow_blank: true,
            },
            trim_whitespace: true,
        }
    }
}

impl Default for CarPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}
