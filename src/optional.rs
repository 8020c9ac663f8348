//! Values that remember whether they were explicitly supplied

/// A flag value plus whether the user actually passed it.
///
/// `--autoclone=false` and an omitted `--autoclone` both hold `false`;
/// only `was_set` tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalValue<T> {
    value: T,
    was_set: bool,
}

impl<T: Default> OptionalValue<T> {
    pub fn unset() -> Self {
        Self::default()
    }
}

impl<T> OptionalValue<T> {
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.was_set = true;
    }

    pub fn get(&self) -> (&T, bool) {
        (&self.value, self.was_set)
    }

    pub fn was_set(&self) -> bool {
        self.was_set
    }
}

impl OptionalValue<bool> {
    /// True only when explicitly set to true.
    pub fn enabled(&self) -> bool {
        self.was_set() && self.value
    }
}

impl<T: Default> From<Option<T>> for OptionalValue<T> {
    fn from(value: Option<T>) -> Self {
        let mut out = Self::unset();
        if let Some(v) = value {
            out.set(v);
        }
        out
    }
}
