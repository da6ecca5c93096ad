//! Format descriptors and the table that owns them
//!
//! A value never stores descriptors inline. Every element the builder walks
//! allocates one [`FormatDescriptor`] in the value's [`FormatTable`] and every
//! character the element spans refers to it through the same [`FormatHandle`].
//! Comparing two handles is therefore an identity test: "do these characters
//! belong to the same formatting run", answered without looking at the
//! descriptor contents.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// Ordered attribute map of a descriptor.
///
/// Source order is kept so that serialized markup lists attributes the way
/// they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert an attribute, replacing the value of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                let mut attributes = Attributes::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    attributes.insert(name, value);
                }
                Ok(attributes)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// One inline formatting element: tag type, attributes, object flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(rename = "isObject", default, skip_serializing_if = "is_false")]
    pub object: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl FormatDescriptor {
    pub fn new(format_type: impl Into<String>) -> Self {
        Self {
            format_type: format_type.into(),
            attributes: Attributes::new(),
            object: false,
        }
    }

    pub fn object(format_type: impl Into<String>) -> Self {
        Self {
            object: true,
            ..Self::new(format_type)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Identity of a descriptor inside one value's [`FormatTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatHandle(usize);

impl FormatHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FormatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena owning every descriptor a value refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatTable {
    descriptors: Vec<FormatDescriptor>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a descriptor and return its fresh handle.
    ///
    /// Equal descriptors inserted twice get two distinct handles.
    pub fn insert(&mut self, descriptor: FormatDescriptor) -> FormatHandle {
        self.descriptors.push(descriptor);
        FormatHandle(self.descriptors.len() - 1)
    }

    pub fn get(&self, handle: FormatHandle) -> Option<&FormatDescriptor> {
        self.descriptors.get(handle.0)
    }

    pub fn contains(&self, handle: FormatHandle) -> bool {
        handle.0 < self.descriptors.len()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormatHandle, &FormatDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (FormatHandle(index), descriptor))
    }
}

impl Index<FormatHandle> for FormatTable {
    type Output = FormatDescriptor;

    fn index(&self, handle: FormatHandle) -> &FormatDescriptor {
        &self.descriptors[handle.0]
    }
}
