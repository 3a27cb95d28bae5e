//! Ordered, editable collections backing the users and messages tables.
//!
//! Every mutation returns a new [`Collection`] with a bumped revision and
//! leaves the receiver untouched, so holders of an older snapshot can tell
//! that something changed by comparing revisions.

use uuid::Uuid;

use crate::error::EditorError;

/// An item that can live in a [`Collection`].
///
/// The id is independent of the item's position and survives every field
/// edit. `Field` names one field together with its new value.
pub trait Editable: Clone {
    type Field;

    fn id(&self) -> Uuid;

    /// Shallow copy with one field replaced; the id is unchanged.
    fn with_field(&self, field: Self::Field) -> Self;

    /// Build a field edit from a field name and the raw text of an input.
    fn parse_field(name: &str, value: &str) -> Result<Self::Field, EditorError>;

    /// Copy with a newly generated id.
    fn with_fresh_id(&self) -> Self;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    revision: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
        }
    }
}

impl<T: Editable> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, revision: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn next(&self, items: Vec<T>) -> Self {
        Self {
            items,
            revision: self.revision + 1,
        }
    }

    /// Replace one field of the item at `index`.
    pub fn set_field(&self, index: usize, field: T::Field) -> Result<Self, EditorError> {
        self.check_index(index)?;
        let mut items = self.items.clone();
        items[index] = self.items[index].with_field(field);
        Ok(self.next(items))
    }

    /// Like [`Collection::set_field`], for edits coming from a text input.
    pub fn set_named_field(&self, index: usize, name: &str, value: &str) -> Result<Self, EditorError> {
        self.check_index(index)?;
        let field = T::parse_field(name, value)?;
        self.set_field(index, field)
    }

    /// Append a copy of `template` under a new id. It lands at `len() - 1`.
    pub fn append(&self, template: &T) -> Self {
        let mut items = self.items.clone();
        items.push(template.with_fresh_id());
        self.next(items)
    }

    /// Remove the item at `index`, shifting later items down by one.
    ///
    /// Positions stored elsewhere (a message's author or quoted message) are
    /// left as they are and may now point at a different item or nothing.
    pub fn remove_at(&self, index: usize) -> Result<Self, EditorError> {
        self.check_index(index)?;
        let mut items = self.items.clone();
        items.remove(index);
        Ok(self.next(items))
    }
}

impl<T: Editable> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HexColor, Message, MessageField, User, UserField};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn users() -> Collection<User> {
        Collection::new(vec![
            User::new("+1", "#111111").with_saved_name("Ana"),
            User::new("+2", "#222222").with_original_name("Bia"),
            User::new("+3", "#333333"),
        ])
    }

    #[test]
    fn test_set_field_keeps_id_and_other_fields() {
        let before = users();
        let after = before
            .set_field(1, UserField::Color(HexColor::new("#abcdef")))
            .unwrap();

        let (old, new) = (before.get(1).unwrap(), after.get(1).unwrap());
        assert_eq!(new.color.as_str(), "#abcdef");
        assert_eq!(new.id, old.id);
        assert_eq!(new.cellphone, old.cellphone);
        assert_eq!(new.original_name, old.original_name);

        // The original snapshot is untouched.
        assert_eq!(old.color.as_str(), "#222222");
        assert_eq!(after.revision(), before.revision() + 1);
    }

    #[test]
    fn test_set_field_out_of_range() {
        let result = users().set_field(3, UserField::Cellphone("+9".into()));
        assert_eq!(result, Err(EditorError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_set_named_field() {
        let after = users().set_named_field(2, "savedName", "Caio").unwrap();
        assert_eq!(after.get(2).unwrap().saved_name.as_deref(), Some("Caio"));

        assert_eq!(
            users().set_named_field(0, "nope", "x"),
            Err(EditorError::UnknownField("nope".into()))
        );
        assert!(matches!(
            users().set_named_field(7, "nope", "x"),
            Err(EditorError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_append_regenerates_id() {
        let template = User::new("+0", "#000000");
        let once = users().append(&template);
        let twice = once.append(&template);

        assert_eq!(twice.len(), 5);
        let a = twice.get(3).unwrap();
        let b = twice.get(4).unwrap();
        assert_ne!(a.id, template.id);
        assert_ne!(b.id, template.id);
        assert_ne!(a.id, b.id);
        assert_eq!(a.cellphone, "+0");
    }

    #[test]
    fn test_append_message_template_twice() {
        let template = Message::new("", "2024-01-01T00:00:00Z");
        let messages = Collection::<Message>::default()
            .append(&template)
            .append(&template);
        assert_eq!(messages.len(), 2);
        assert_ne!(messages.get(0).unwrap().id, messages.get(1).unwrap().id);
        assert!(messages.get(1).unwrap().is_draft());
    }

    #[test]
    fn test_remove_at_shifts() {
        let before = users();
        let third = before.get(2).unwrap().id;
        let after = before.remove_at(1).unwrap();

        assert_eq!(after.len(), 2);
        assert_eq!(after.get(1).unwrap().id, third);
        assert_eq!(
            after.remove_at(2),
            Err(EditorError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_set_message_field() {
        let messages = Collection::new(vec![Message::new("a", "t").by(0)]);
        let after = messages
            .set_field(0, MessageField::MentionIndex(Some(0)))
            .unwrap();
        assert_eq!(after.get(0).unwrap().mention_index, Some(0));
        assert_eq!(after.get(0).unwrap().user_index, Some(0));
    }

    proptest! {
        #[test]
        fn prop_append_grows_by_one_with_unique_ids(count in 0usize..8, appends in 1usize..6) {
            let mut coll = Collection::new(
                (0..count).map(|i| User::new(format!("+{i}"), "#000000")).collect(),
            );
            let template = User::new("+t", "#000000");
            for _ in 0..appends {
                let len = coll.len();
                coll = coll.append(&template);
                prop_assert_eq!(coll.len(), len + 1);
            }
            let ids: HashSet<_> = coll.iter().map(|u| u.id).collect();
            prop_assert_eq!(ids.len(), coll.len());
            prop_assert!(!ids.contains(&template.id));
        }

        #[test]
        fn prop_remove_at_shifts_next_item(count in 1usize..10, pick in 0usize..10) {
            let index = pick % count;
            let coll = Collection::new(
                (0..count).map(|i| User::new(format!("+{i}"), "#000000")).collect(),
            );
            let next_id = coll.get(index + 1).map(|u| u.id);
            let after = coll.remove_at(index).unwrap();
            prop_assert_eq!(after.len(), count - 1);
            prop_assert_eq!(after.get(index).map(|u| u.id), next_id);
        }
    }
}
