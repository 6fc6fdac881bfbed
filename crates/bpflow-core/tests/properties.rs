//! Property tests for the type and id helpers.
//!
//! Tests cover:
//! - Category tags parsing back to the same category in any letter case
//! - `simple_name_from_path` over generated-class and default-object paths
//! - Container signatures wrapping the element signature
//! - Short id prefixes

use bpflow_core::types::simple_name_from_path;
use bpflow_core::{NodeId, PinCategory, PinType};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn known_category() -> impl Strategy<Value = PinCategory> {
    prop::sample::select(vec![
        PinCategory::Exec,
        PinCategory::Bool,
        PinCategory::Byte,
        PinCategory::Int,
        PinCategory::Int64,
        PinCategory::Real,
        PinCategory::Float,
        PinCategory::Double,
        PinCategory::String,
        PinCategory::Text,
        PinCategory::Name,
        PinCategory::Object,
        PinCategory::Class,
        PinCategory::Struct,
        PinCategory::Enum,
        PinCategory::SoftObject,
        PinCategory::Delegate,
        PinCategory::MulticastDelegate,
        PinCategory::Wildcard,
    ])
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn category_tags_parse_back(category in known_category(), upper in any::<bool>()) {
        let tag = if upper {
            category.as_str().to_ascii_uppercase()
        } else {
            category.as_str().to_string()
        };
        prop_assert_eq!(PinCategory::from_tag(&tag), category);
    }

    #[test]
    fn unknown_tags_are_stable(tag in "[A-Za-z0-9]{1,12}") {
        let parsed = PinCategory::from_tag(&tag);
        prop_assert_eq!(PinCategory::from_tag(parsed.as_str()), parsed);
    }

    #[test]
    fn class_paths_reduce_to_the_asset_name(
        dir in "[A-Z][a-z]{0,8}",
        name in "[A-Z][A-Za-z0-9]{0,12}",
    ) {
        let generated = format!("/Game/{dir}/{name}.{name}_C");
        let default_object = format!("/Script/{dir}.Default__{name}");
        prop_assert_eq!(simple_name_from_path(&generated), name.clone());
        prop_assert_eq!(simple_name_from_path(&default_object), name);
    }

    #[test]
    fn containers_wrap_the_element_signature(
        category in prop::sample::select(vec![
            PinCategory::Bool,
            PinCategory::Int,
            PinCategory::Float,
            PinCategory::String,
            PinCategory::Name,
        ]),
    ) {
        let element = PinType::new(category.clone()).signature();
        prop_assert_eq!(
            PinType::new(category.clone()).array_of().signature(),
            format!("Array<{element}>")
        );
        prop_assert_eq!(
            PinType::new(category).set_of().signature(),
            format!("Set<{element}>")
        );
    }

    #[test]
    fn short_ids_are_prefixes(id in "\\PC{0,20}") {
        let node = NodeId::new(id.clone());
        let short = node.short();
        prop_assert!(id.starts_with(short));
        prop_assert!(short.chars().count() <= 8);
    }
}
