//! Property tests for watch root resolution.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use housekeeper::targets::{resolve, WatchRequest};
use housekeeper::Config;

fn name() -> impl Strategy<Value = String> {
    // Unlikely to exist, so canonicalization leaves the paths alone
    proptest::string::string_regex("hk-prop-[a-z]{1,3}").unwrap()
}

fn base() -> PathBuf {
    std::env::temp_dir().join("housekeeper-prop-missing")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Resolved roots are absolute, unique, and keep first-seen order.
    #[test]
    fn property_resolve_dedups_in_order(
        config_names in proptest::collection::vec(name(), 0..6),
        cli_names in proptest::collection::vec(name(), 0..6),
        relative in any::<bool>(),
    ) {
        let base = base();
        let mut config = Config::default();
        config.watch.include_defaults = false;
        config.directories = config_names.iter().map(|n| base.join(n)).collect();

        let extra: Vec<PathBuf> = cli_names
            .iter()
            .map(|n| if relative { PathBuf::from(n) } else { base.join(n) })
            .collect();
        let request = WatchRequest { only: false, extra };

        let roots = resolve(&request, &config, &base);

        let mut expected: Vec<PathBuf> = Vec::new();
        for n in config_names.iter().chain(cli_names.iter()) {
            let p = base.join(n);
            if !expected.contains(&p) {
                expected.push(p);
            }
        }
        prop_assert_eq!(&roots, &expected);
        prop_assert!(roots.iter().all(|p| p.is_absolute()));
    }

    /// PROPERTY: `--only` never pulls in configured directories.
    #[test]
    fn property_only_ignores_config(
        config_names in proptest::collection::vec(name(), 1..6),
        cli_names in proptest::collection::vec(name(), 0..6),
    ) {
        let base = base();
        let mut config = Config::default();
        config.directories = config_names.iter().map(|n| base.join("config").join(n)).collect();

        let request = WatchRequest {
            only: true,
            extra: cli_names.iter().map(|n| base.join(n)).collect(),
        };
        let roots = resolve(&request, &config, Path::new(&base));

        prop_assert!(roots.iter().all(|p| !p.starts_with(base.join("config"))));
        if cli_names.is_empty() {
            prop_assert_eq!(roots, vec![base.clone()]);
        }
    }
}
