use std::fmt;

/// Value of a single version part.
///
/// SemVer numeric fields are kept as numbers, everything else (regex captures,
/// prerelease and build identifiers) as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Number(u64),
    Text(String),
}

impl PartValue {
    /// True for numbers and for non-empty text made only of ASCII digits
    pub fn is_numeric(&self) -> bool {
        match self {
            PartValue::Number(_) => true,
            PartValue::Text(s) => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
        }
    }

    /// The zero value of the same flavour ("0" text stays text)
    pub fn zero(&self) -> Self {
        match self {
            PartValue::Number(_) => PartValue::Number(0),
            PartValue::Text(_) => PartValue::Text("0".to_string()),
        }
    }
}

impl fmt::Display for PartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartValue::Number(n) => write!(f, "{}", n),
            PartValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PartValue {
    fn from(s: &str) -> Self {
        PartValue::Text(s.to_string())
    }
}

impl From<u64> for PartValue {
    fn from(n: u64) -> Self {
        PartValue::Number(n)
    }
}

/// Parsed, ordered representation of a version string.
///
/// Holds one slot per part the producing scheme knows about, most significant
/// first. A slot without a value is an absent part. Slot order is fixed at
/// construction and never changes, so a part removed by a bump comes back at
/// its original position only when it is bumped explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredVersion {
    slots: Vec<(String, Option<PartValue>)>,
}

impl StructuredVersion {
    /// Create a version with the given slots, all absent
    pub fn with_slots<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StructuredVersion {
            slots: names.into_iter().map(|n| (n.into(), None)).collect(),
        }
    }

    /// Builder-style setter, adding the slot at the end if it does not exist yet
    pub fn with(mut self, name: &str, value: impl Into<PartValue>) -> Self {
        let value = value.into();
        match self.slots.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = Some(value),
            None => self.slots.push((name.to_string(), Some(value))),
        }
        self
    }

    /// Value of a present part
    pub fn get(&self, name: &str) -> Option<&PartValue> {
        self.slots
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether the version has a slot for `name`, present or not
    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|(n, _)| n == name)
    }

    /// Position of the slot for `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|(n, _)| n == name)
    }

    /// Present parts in significance order
    pub fn parts(&self) -> impl Iterator<Item = (&str, &PartValue)> {
        self.slots
            .iter()
            .filter_map(|(n, v)| v.as_ref().map(|v| (n.as_str(), v)))
    }

    /// All slot names in significance order
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(n, _)| n.as_str())
    }

    /// Return a new version with slot `index` replaced and every slot after it
    /// mapped through `reset`.
    ///
    /// `reset` receives the current value of each less significant part and
    /// returns its new value (`None` removes the part).
    pub fn replaced_at<F>(&self, index: usize, value: Option<PartValue>, reset: F) -> Self
    where
        F: Fn(&PartValue) -> Option<PartValue>,
    {
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, (name, current))| {
                let next = if i < index {
                    current.clone()
                } else if i == index {
                    value.clone()
                } else {
                    current.as_ref().and_then(&reset)
                };
                (name.clone(), next)
            })
            .collect();
        StructuredVersion { slots }
    }
}

/// What the user asked for: an explicit new version or parts to bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpRequest {
    Explicit(String),
    Parts(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructuredVersion {
        StructuredVersion::with_slots(["major", "minor", "patch", "build"])
            .with("major", "1")
            .with("minor", "2")
            .with("patch", "3")
    }

    #[test]
    fn test_parts_skip_absent_slots() {
        let v = sample();
        let names: Vec<&str> = v.parts().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["major", "minor", "patch"]);
        assert!(v.has_slot("build"));
        assert_eq!(v.get("build"), None);
    }

    #[test]
    fn test_with_appends_unknown_slot() {
        let v = sample().with("local", "abc");
        assert_eq!(v.position("local"), Some(4));
    }

    #[test]
    fn test_replaced_at_keeps_more_significant_parts() {
        let v = sample().with("build", "beta");
        let next = v.replaced_at(1, Some(PartValue::from("3")), |_| None);
        assert_eq!(next.get("major"), Some(&PartValue::from("1")));
        assert_eq!(next.get("minor"), Some(&PartValue::from("3")));
        assert_eq!(next.get("patch"), None);
        assert_eq!(next.get("build"), None);
        // original untouched
        assert_eq!(v.get("patch"), Some(&PartValue::from("3")));
    }

    #[test]
    fn test_is_numeric() {
        assert!(PartValue::Number(0).is_numeric());
        assert!(PartValue::from("007").is_numeric());
        assert!(!PartValue::from("").is_numeric());
        assert!(!PartValue::from("rc1").is_numeric());
    }

    #[test]
    fn test_zero_keeps_flavour() {
        assert_eq!(PartValue::Number(5).zero(), PartValue::Number(0));
        assert_eq!(PartValue::from("5").zero(), PartValue::from("0"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PartValue::Number(42).to_string(), "42");
        assert_eq!(PartValue::from("rc.1").to_string(), "rc.1");
    }
}
