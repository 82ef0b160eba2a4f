//! Subtype-to-display label remapping.

/// Umbrella display label the keratinocyte-derived subtypes collapse to.
pub const KERATINOCYTES: &str = "keratinocytes";

/// Subtypes that share a keratinocyte origin and a common display label.
pub const KERATINOCYTE_SUBTYPES: &[&str] = &[
    "actinic_keratosis",
    "basal_cell_carcinoma",
    "squamous_cell_carcinoma",
];

/// Map a fine-grained malignant subtype to its display label. Labels
/// outside the keratinocyte group pass through unchanged, including
/// unknown ones; the orchestrator is responsible for flagging those.
pub fn remap(subtype: &str) -> &str {
    if KERATINOCYTE_SUBTYPES.contains(&subtype) {
        KERATINOCYTES
    } else {
        subtype
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::MALIGNANT_SUBTYPES;

    #[test]
    fn test_keratinocyte_subtypes_collapse() {
        assert_eq!(remap("actinic_keratosis"), KERATINOCYTES);
        assert_eq!(remap("basal_cell_carcinoma"), KERATINOCYTES);
        assert_eq!(remap("squamous_cell_carcinoma"), KERATINOCYTES);
    }

    #[test]
    fn test_other_known_subtypes_are_identity() {
        for subtype in MALIGNANT_SUBTYPES.labels() {
            if !KERATINOCYTE_SUBTYPES.contains(subtype) {
                assert_eq!(remap(subtype), *subtype);
            }
        }
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        assert_eq!(remap("class_7"), "class_7");
    }

    #[test]
    fn test_group_is_subset_of_subtype_set() {
        for subtype in KERATINOCYTE_SUBTYPES {
            assert!(MALIGNANT_SUBTYPES.contains(subtype));
        }
    }
}
