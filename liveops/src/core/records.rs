//! Index-addressed edits shared by every record list.
//!
//! Each helper returns a fresh list and leaves the input untouched. A stale
//! index is reported, never a panic.

use crate::core::types::{MutationError, Section};

/// Copy `items` with `edit` applied to the element at `index`.
pub fn update_at<T: Clone>(
    items: &[T],
    section: Section,
    index: usize,
    edit: impl FnOnce(&mut T),
) -> Result<Vec<T>, MutationError> {
    check_index(items, section, index)?;
    let mut next = items.to_vec();
    edit(&mut next[index]);
    Ok(next)
}

/// Copy `items` without the element at `index`.
pub fn remove_at<T: Clone>(
    items: &[T],
    section: Section,
    index: usize,
) -> Result<Vec<T>, MutationError> {
    check_index(items, section, index)?;
    let mut next = items.to_vec();
    next.remove(index);
    Ok(next)
}

/// Copy `items` with `item` appended.
pub fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

fn check_index<T>(items: &[T], section: Section, index: usize) -> Result<(), MutationError> {
    if index < items.len() {
        return Ok(());
    }
    Err(MutationError::IndexOutOfRange {
        section,
        index,
        len: items.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_at_rewrites_one_element() {
        let items = vec![1, 2, 3];
        let next = update_at(&items, Section::Episodes, 1, |value| *value *= 10).expect("update");
        assert_eq!(next, vec![1, 20, 3]);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn stale_index_is_reported() {
        let items = vec!["a"];
        let err = remove_at(&items, Section::PlatformRows, 1).expect_err("out of range");
        assert_eq!(
            err,
            MutationError::IndexOutOfRange {
                section: Section::PlatformRows,
                index: 1,
                len: 1,
            }
        );
    }
}
