//! # Tag Registry and Change Detection
//!
//! Maps each known tag to a slot holding the last value accepted for it. A value is
//! reported only when it differs from the one stored, so consumers see transitions rather
//! than the full field set of every frame.
//!
//! The registry is the only state carried from one frame to the next. It lives in memory
//! for the lifetime of the process and has a single writer, [`TagRegistry::process`].

use crate::error::TicError;
use crate::tic::fields::FieldDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Last value known for one field.
#[derive(Debug, Clone)]
pub struct TagSlot {
    descriptor: Arc<FieldDescriptor>,
    last_value: Option<Vec<u8>>,
}

impl TagSlot {
    pub fn new(descriptor: Arc<FieldDescriptor>) -> Self {
        TagSlot {
            descriptor,
            last_value: None,
        }
    }

    pub fn descriptor(&self) -> &Arc<FieldDescriptor> {
        &self.descriptor
    }

    pub fn last_value(&self) -> Option<&[u8]> {
        self.last_value.as_deref()
    }

    pub fn has_value(&self) -> bool {
        self.last_value.is_some()
    }

    /// Stores `data`, bounded to the declared length. Returns true if the stored value changed.
    fn update(&mut self, data: &[u8]) -> bool {
        let value = &data[..data.len().min(self.descriptor.len)];
        match &mut self.last_value {
            Some(stored) if stored.as_slice() == value => false,
            Some(stored) => {
                stored.clear();
                stored.extend_from_slice(value);
                true
            }
            None => {
                self.last_value = Some(value.to_vec());
                true
            }
        }
    }
}

/// A value to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub descriptor: Arc<FieldDescriptor>,
    pub value: String,
}

/// Outcome of feeding one group to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No descriptor for this tag
    Unknown,
    /// Same value as last time
    Unchanged,
    /// First value or a new one
    Changed(FieldUpdate),
}

/// Known fields, keyed by tag.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    slots: HashMap<Vec<u8>, TagSlot>,
    order: Vec<Arc<FieldDescriptor>>,
}

impl TagRegistry {
    /// Builds the registry with every slot empty. Duplicate tags are rejected.
    pub fn new<I>(descriptors: I) -> Result<Self, TicError>
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        let mut slots = HashMap::new();
        let mut order = Vec::new();

        for descriptor in descriptors {
            let descriptor = Arc::new(descriptor);
            let key = descriptor.tag.as_bytes().to_vec();
            if slots.contains_key(&key) {
                return Err(TicError::DuplicateTag(descriptor.tag.clone()));
            }
            slots.insert(key, TagSlot::new(Arc::clone(&descriptor)));
            order.push(descriptor);
        }

        Ok(TagRegistry { slots, order })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptors in table order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.order.iter().map(|d| d.as_ref())
    }

    pub fn get(&self, tag: &str) -> Option<&TagSlot> {
        self.slots.get(tag.as_bytes())
    }

    /// Feeds one checksum-valid group.
    ///
    /// Unknown tags are ignored. A known tag seen for the first time always counts as a
    /// change; afterwards only a byte-wise different (truncated) value does.
    pub fn process(&mut self, tag: &[u8], data: &[u8]) -> Detection {
        let Some(slot) = self.slots.get_mut(tag) else {
            return Detection::Unknown;
        };

        if !slot.update(data) {
            return Detection::Unchanged;
        }

        let value = slot.last_value().unwrap_or_default();
        Detection::Changed(FieldUpdate {
            descriptor: Arc::clone(&slot.descriptor),
            value: String::from_utf8_lossy(value).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tic::fields::HomieDatatype;

    fn registry() -> TagRegistry {
        TagRegistry::new([
            FieldDescriptor::new("IINST", 3, "Intensité instantanée", HomieDatatype::Integer, "A"),
            FieldDescriptor::new("PAPP", 5, "Puissance apparente", HomieDatatype::Integer, "VA"),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_value_is_a_change() {
        let mut registry = registry();
        assert!(!registry.get("IINST").unwrap().has_value());
        match registry.process(b"IINST", b"002") {
            Detection::Changed(update) => {
                assert_eq!(update.descriptor.tag, "IINST");
                assert_eq!(update.value, "002");
            }
            other => panic!("unexpected detection: {other:?}"),
        }
        assert_eq!(registry.get("IINST").unwrap().last_value(), Some(&b"002"[..]));
    }

    #[test]
    fn test_same_value_is_suppressed() {
        let mut registry = registry();
        registry.process(b"PAPP", b"00750");
        assert_eq!(registry.process(b"PAPP", b"00750"), Detection::Unchanged);
        assert!(matches!(registry.process(b"PAPP", b"00760"), Detection::Changed(_)));
    }

    #[test]
    fn test_long_data_is_truncated() {
        let mut registry = registry();
        match registry.process(b"IINST", b"00299") {
            Detection::Changed(update) => assert_eq!(update.value, "002"),
            other => panic!("unexpected detection: {other:?}"),
        }
        // Same first three bytes: nothing new once truncated
        assert_eq!(registry.process(b"IINST", b"00288"), Detection::Unchanged);
    }

    #[test]
    fn test_shorter_value_replaces_longer() {
        let mut registry = registry();
        registry.process(b"PAPP", b"00750");
        assert!(matches!(registry.process(b"PAPP", b"750"), Detection::Changed(_)));
        assert_eq!(registry.get("PAPP").unwrap().last_value(), Some(&b"750"[..]));
    }

    #[test]
    fn test_unknown_tag() {
        let mut registry = registry();
        assert_eq!(registry.process(b"IMAX", b"030"), Detection::Unknown);
        assert!(registry.get("IMAX").is_none());
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let err = TagRegistry::new([
            FieldDescriptor::new("PAPP", 5, "a", HomieDatatype::Integer, "VA"),
            FieldDescriptor::new("PAPP", 5, "b", HomieDatatype::Integer, "VA"),
        ])
        .unwrap_err();
        assert!(matches!(err, TicError::DuplicateTag(tag) if tag == "PAPP"));
    }
}
