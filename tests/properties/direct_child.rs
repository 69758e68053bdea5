//! Property tests for the direct-child filter.

use std::path::PathBuf;

use proptest::prelude::*;

use housekeeper::watcher::{DirectChildFilter, EventNormalizer, ItemType, RawEvent};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._ -]{1,16}")
        .unwrap()
        .prop_filter("must be a normal component", |s| {
            s != "." && s != ".." && s.trim() == s.as_str()
        })
}

fn root_for(segments: &[String]) -> PathBuf {
    segments
        .iter()
        .fold(std::env::temp_dir(), |path, s| path.join(s))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A direct child of the root is reported with its own path and type.
    #[test]
    fn property_direct_child_is_reported(
        root_segments in proptest::collection::vec(segment(), 0..=3),
        name in segment(),
        is_directory in any::<bool>(),
    ) {
        let root = root_for(&root_segments);
        let filter = DirectChildFilter::new(&root);
        let path = root.join(&name);

        let event = filter.classify(&RawEvent::new(&path, is_directory));
        let event = event.expect("direct child must be reported");
        prop_assert_eq!(&event.path, &path);
        prop_assert_eq!(event.item_type, ItemType::from_is_directory(is_directory));
        prop_assert_eq!(event.root(), Some(root.as_path()));
    }

    /// PROPERTY: Anything deeper than one level below the root is never reported.
    #[test]
    fn property_nested_path_is_ignored(
        root_segments in proptest::collection::vec(segment(), 0..=3),
        nested in proptest::collection::vec(segment(), 2..=5),
        is_directory in any::<bool>(),
    ) {
        let root = root_for(&root_segments);
        let filter = DirectChildFilter::new(&root);
        let path = nested.iter().fold(root.clone(), |p, s| p.join(s));

        prop_assert!(filter.classify(&RawEvent::new(&path, is_directory)).is_none());
    }

    /// PROPERTY: The root itself and its ancestors are never reported.
    #[test]
    fn property_root_and_ancestors_are_ignored(
        root_segments in proptest::collection::vec(segment(), 1..=4),
    ) {
        let root = root_for(&root_segments);
        let filter = DirectChildFilter::new(&root);

        for ancestor in root.ancestors() {
            prop_assert!(filter.classify(&RawEvent::new(ancestor, true)).is_none());
        }
    }

    /// PROPERTY: A child of a sibling directory with a shared name prefix is ignored.
    #[test]
    fn property_sibling_prefix_is_ignored(
        root_name in segment(),
        suffix in segment(),
        name in segment(),
    ) {
        let root = std::env::temp_dir().join(&root_name);
        let sibling = std::env::temp_dir().join(format!("{root_name}{suffix}"));
        let filter = DirectChildFilter::new(&root);

        prop_assert!(filter.classify(&RawEvent::new(sibling.join(&name), false)).is_none());
    }

    /// PROPERTY: UTF-8 byte paths classify exactly like native paths.
    #[test]
    fn property_byte_paths_match_native(
        root_segments in proptest::collection::vec(segment(), 0..=2),
        tail in proptest::collection::vec(segment(), 1..=3),
        is_directory in any::<bool>(),
    ) {
        let root = root_for(&root_segments);
        let filter = DirectChildFilter::new(&root);
        let path = tail.iter().fold(root.clone(), |p, s| p.join(s));
        let Some(text) = path.to_str() else {
            return Ok(());
        };

        let native = filter.classify(&RawEvent::new(&path, is_directory));
        let bytes = filter.classify(&RawEvent::from_bytes(text.as_bytes(), is_directory));
        prop_assert_eq!(native, bytes);
    }

    /// PROPERTY: Classification never panics on arbitrary bytes.
    #[test]
    fn property_arbitrary_bytes_never_panic(
        bytes in proptest::collection::vec(any::<u8>(), 0..128),
        is_directory in any::<bool>(),
    ) {
        let filter = DirectChildFilter::new(std::env::temp_dir());
        let _ = filter.classify(&RawEvent::from_bytes(bytes, is_directory));
    }
}
