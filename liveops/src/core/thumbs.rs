//! Thumbnail A/B test variants.
//!
//! Variant ids are positional letters assigned from the current count, so a
//! delete followed by an add can reuse an id. Consumers must not treat ids as
//! unique keys.

use crate::core::records::{append, remove_at, update_at};
use crate::core::types::{MutationError, Section, VariantPatch};
use crate::document::{ThumbVariant, VariantStatus};

/// Letter id for the variant at `position` (`A`, `B`, …, `Z`, `AA`, `AB`, …).
pub fn variant_letter(position: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = position + 1;
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'A' + (remaining % 26) as u8));
        remaining /= 26;
    }
    letters.iter().rev().collect()
}

pub fn add_variant(variants: &[ThumbVariant]) -> Vec<ThumbVariant> {
    let variant = ThumbVariant {
        id: variant_letter(variants.len()),
        episode_number: "1".to_string(),
        hypothesis: String::new(),
        status: VariantStatus::Planned,
        ctr: 0.0,
        notes: String::new(),
    };
    append(variants, variant)
}

pub fn update_variant(
    variants: &[ThumbVariant],
    index: usize,
    patch: &VariantPatch,
) -> Result<Vec<ThumbVariant>, MutationError> {
    update_at(variants, Section::Variants, index, |variant| {
        patch.apply(variant);
    })
}

pub fn delete_variant(
    variants: &[ThumbVariant],
    index: usize,
) -> Result<Vec<ThumbVariant>, MutationError> {
    remove_at(variants, Section::Variants, index)
}

/// Coerce edited CTR text: keeps digits and `.`, failure yields 0.
pub fn coerce_ctr(input: &str) -> f64 {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    kept.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_the_alphabet() {
        let mut variants = Vec::new();
        for _ in 0..3 {
            variants = add_variant(&variants);
        }
        let ids: Vec<&str> = variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(variants[0].status, VariantStatus::Planned);
        assert_eq!(variants[0].episode_number, "1");
    }

    #[test]
    fn delete_then_add_reuses_a_letter() {
        let variants = add_variant(&[]);
        let variants = delete_variant(&variants, 0).expect("delete");
        let variants = add_variant(&variants);
        assert_eq!(variants[0].id, "A");

        let three = add_variant(&add_variant(&variants));
        let without_b = delete_variant(&three, 1).expect("delete");
        let readded = add_variant(&without_b);
        let ids: Vec<&str> = readded.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "C"]);
    }

    #[test]
    fn letters_continue_past_z() {
        assert_eq!(variant_letter(0), "A");
        assert_eq!(variant_letter(25), "Z");
        assert_eq!(variant_letter(26), "AA");
        assert_eq!(variant_letter(27), "AB");
        assert_eq!(variant_letter(701), "ZZ");
        assert_eq!(variant_letter(702), "AAA");
    }

    #[test]
    fn ctr_coercion() {
        assert_eq!(coerce_ctr("4.5%"), 4.5);
        assert_eq!(coerce_ctr("abc"), 0.0);
        assert_eq!(coerce_ctr("1.2.3"), 0.0);
        assert_eq!(coerce_ctr(""), 0.0);
    }

    #[test]
    fn update_sets_status_and_ctr() {
        let variants = add_variant(&[]);
        let patch = VariantPatch {
            status: Some(VariantStatus::Winner),
            ctr: Some(7.25),
            ..VariantPatch::default()
        };
        let updated = update_variant(&variants, 0, &patch).expect("update");
        assert_eq!(updated[0].status, VariantStatus::Winner);
        assert_eq!(updated[0].ctr, 7.25);
        assert!(update_variant(&updated, 1, &patch).is_err());
    }
}
