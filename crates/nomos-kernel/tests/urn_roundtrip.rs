use nomos_kernel::{Urn, ValidationContext, validate_urn};
use nomos_registry::RegistryStore;
use nomos_spec::{ResourceType, SpecStore};
use proptest::prelude::*;

fn component() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,16}"
}

fn arb_urn() -> impl Strategy<Value = Urn> {
    (
        component(),
        component(),
        component(),
        component(),
        proptest::option::of(component()),
    )
        .prop_map(|(scheme, namespace, resource_type, identifier, version)| Urn {
            scheme,
            namespace,
            resource_type,
            identifier,
            version,
        })
}

// Reserved in the shipped naming and namespace rule sets.
const RESERVED: [&str; 8] = [
    "admin", "internal", "kernel", "null", "private", "reserved", "root", "system",
];

fn arb_resource_type() -> impl Strategy<Value = ResourceType> {
    proptest::sample::select(ResourceType::ALL.to_vec())
}

proptest! {
    /// Formatting a parsed URN reproduces the input byte for byte.
    #[test]
    fn format_parse_is_identity(urn in arb_urn()) {
        let text = urn.to_string();
        let parsed: Urn = text.parse().expect("well-formed urn parses");
        prop_assert_eq!(parsed.to_string(), text);
        prop_assert_eq!(parsed, urn);
    }

    /// Any URN built from conforming parts validates without errors.
    #[test]
    fn conforming_urns_validate(
        namespace in "[a-z][a-z0-9]{2,10}",
        resource_type in arb_resource_type(),
        identifier in "[a-z][a-z0-9]{0,7}(-[a-z0-9]{1,8}){0,2}",
        version in proptest::option::of((0u32..50, 0u32..50, 0u32..50)),
    ) {
        prop_assume!(!RESERVED.contains(&namespace.as_str()));
        prop_assume!(!RESERVED.contains(&identifier.as_str()));
        let spec = SpecStore::builtin().expect("builtin specs");
        let registry = RegistryStore::new();
        let ctx = ValidationContext::new(&spec, &registry);
        let mut text = format!("urn:{namespace}:{resource_type}:{identifier}");
        if let Some((major, minor, patch)) = version {
            text.push_str(&format!(":v{major}.{minor}.{patch}"));
        }
        let out = validate_urn(&ctx, &text, false);
        prop_assert!(out.ok(), "{} -> {:?}", text, out.errors);
    }
}
