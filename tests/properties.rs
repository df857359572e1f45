//! Property tests for the HSTS decision.

use std::time::Duration;

use hsts::{header::HeaderMap, Config, Decision, Policy, RequestContext};
use proptest::prelude::*;

/// The inputs a `Config` was generated from.
#[derive(Clone, Debug)]
struct Settings {
    secs: u64,
    nanos: u32,
    include_subdomains: bool,
    preload: bool,
    enable_for_localhost: bool,
}

impl Settings {
    fn config(&self) -> Config {
        let mut config = Config::new().max_age(Duration::new(self.secs, self.nanos));
        if self.include_subdomains {
            config = config.include_subdomains();
        }
        if self.preload {
            config = config.preload();
        }
        if self.enable_for_localhost {
            config = config.enable_for_localhost();
        }
        config
    }

    fn policy(&self) -> Policy {
        Policy::try_new(&self.config()).unwrap()
    }
}

fn arb_settings() -> impl Strategy<Value = Settings> {
    (
        any::<u64>(),
        0u32..1_000_000_000,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(secs, nanos, include_subdomains, preload, enable_for_localhost)| Settings {
                secs,
                nanos,
                include_subdomains,
                preload,
                enable_for_localhost,
            },
        )
}

/// Mixed-case spellings of `localhost`.
fn arb_localhost() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), 9).prop_map(|upper| {
        "localhost"
            .chars()
            .zip(upper)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

fn arb_domain() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9-]{1,20}\\.[a-z]{2,6}").unwrap()
}

fn hsts_values(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all("Strict-Transport-Security")
        .into_iter()
        .map(|value| value.to_str().unwrap().to_owned())
        .collect()
}

proptest! {
    /// Property: insecure requests never get the header.
    #[test]
    fn proptest_insecure_never_emits(
        settings in arb_settings(),
        host in prop_oneof![arb_localhost(), arb_domain()],
    ) {
        let mut headers = HeaderMap::new();
        let decision = settings
            .policy()
            .process(&RequestContext::new(false, &host), &mut headers);
        prop_assert_eq!(decision, Decision::SkipInsecure);
        prop_assert!(headers.is_empty());
    }

    /// Property: localhost in any letter case is skipped unless enabled.
    #[test]
    fn proptest_localhost_skipped(settings in arb_settings(), host in arb_localhost()) {
        let mut headers = HeaderMap::new();
        let decision = settings
            .policy()
            .process(&RequestContext::new(true, &host), &mut headers);
        if settings.enable_for_localhost {
            prop_assert_eq!(hsts_values(&headers).len(), 1);
        } else {
            prop_assert_eq!(decision, Decision::SkipLocalhost);
            prop_assert!(headers.is_empty());
        }
    }

    /// Property: secure requests to other hosts get exactly one value, with the directives in
    /// order and the max age truncated to whole seconds.
    #[test]
    fn proptest_secure_emits_once(settings in arb_settings(), host in arb_domain()) {
        let mut headers = HeaderMap::new();
        settings
            .policy()
            .process(&RequestContext::new(true, &host), &mut headers);
        let values = hsts_values(&headers);
        prop_assert_eq!(values.len(), 1);

        let mut expected = format!("max-age={}", settings.secs);
        if settings.include_subdomains {
            expected.push_str("; includeSubDomains");
        }
        if settings.preload {
            expected.push_str("; preload");
        }
        prop_assert_eq!(&values[0], &expected);
    }

    /// Property: the host's port never changes the decision.
    #[test]
    fn proptest_port_is_ignored(
        settings in arb_settings(),
        host in prop_oneof![arb_localhost(), arb_domain()],
        port in any::<u16>(),
    ) {
        let policy = settings.policy();
        let with_port = format!("{}:{}", host, port);
        prop_assert_eq!(
            policy.decide(&RequestContext::new(true, &host)),
            policy.decide(&RequestContext::new(true, &with_port))
        );
    }
}
