use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One field of a partial update.
///
/// `Absent` leaves the stored value alone; `Present` carries the new value.
/// For nullable columns use `Patch<Option<T>>`, so an explicit `null`
/// (`Present(None)`) stays distinguishable from an omitted field.
///
/// Struct fields of this type need `#[serde(default, skip_serializing_if =
/// "Patch::is_absent")]` so that omitted keys map to `Absent` both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Patch<T> {
    Absent,
    Present(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Patch::Present(_))
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Present(value) => Patch::Present(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Present(value) => Patch::Present(f(value)),
        }
    }

    pub fn present(self) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Present(value) => Some(value),
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Absent => serializer.serialize_none(),
            Patch::Present(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Present)
    }
}
