use crate::catalog::RuntimeCatalog;
use crate::error::RuntimeError;
use crate::runtime::RuntimeIdentifier;

/// Returns the latest runtime among `candidates`.
///
/// Candidates must be non-empty and share one family once the catalog has
/// resolved aliases. Versions compare numerically by `(major, minor)`. When
/// several candidates decode to the same version the first one passed wins,
/// keeping its original spelling. A deprecated winner is an error; there is no
/// fallback to an older runtime.
pub fn determine_latest_runtime<C>(
    candidates: &[RuntimeIdentifier],
    catalog: &C,
) -> Result<RuntimeIdentifier, RuntimeError>
where
    C: RuntimeCatalog + ?Sized,
{
    let (first, rest) = candidates
        .split_first()
        .ok_or(RuntimeError::EmptyCandidateSet)?;
    let family = catalog.canonical_family(first.family());

    let mut latest = first;
    for candidate in rest {
        let candidate_family = catalog.canonical_family(candidate.family());
        if candidate_family != family {
            return Err(RuntimeError::MixedFamily {
                expected: family.to_string(),
                found: candidate_family.to_string(),
                runtime: candidate.name().to_string(),
            });
        }
        if candidate.version() > latest.version() {
            latest = candidate;
        }
    }

    if catalog.is_deprecated(latest) {
        return Err(RuntimeError::DeprecatedRuntime {
            runtime: latest.name().to_string(),
        });
    }

    Ok(latest.clone())
}

/// Parses `names` and resolves them with [`determine_latest_runtime`].
pub fn determine_latest_runtime_from_names<S, C>(
    names: &[S],
    catalog: &C,
) -> Result<RuntimeIdentifier, RuntimeError>
where
    S: AsRef<str>,
    C: RuntimeCatalog + ?Sized,
{
    let candidates = names
        .iter()
        .map(|name| RuntimeIdentifier::parse(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    determine_latest_runtime(&candidates, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuntimeRegistry;

    fn resolve(names: &[&str]) -> Result<RuntimeIdentifier, RuntimeError> {
        determine_latest_runtime_from_names(names, &RuntimeRegistry::new())
    }

    #[test]
    fn picks_numeric_maximum_not_lexical() {
        let latest = resolve(&["node9", "node18"]).expect("resolution should pass");
        assert_eq!(latest.name(), "node18");

        let latest = resolve(&["python3.10", "python3.9", "python3.11"]).expect("resolution");
        assert_eq!(latest.name(), "python3.11");
    }

    #[test]
    fn single_candidate_is_returned_as_is() {
        let latest = resolve(&["nodejs20.x"]).expect("resolution should pass");
        assert_eq!(latest.name(), "nodejs20.x");
    }

    #[test]
    fn empty_set_fails() {
        assert_eq!(resolve(&[]), Err(RuntimeError::EmptyCandidateSet));
        assert_eq!(
            determine_latest_runtime(&[], &RuntimeRegistry::new()),
            Err(RuntimeError::EmptyCandidateSet)
        );
    }

    #[test]
    fn mixed_families_fail_even_when_later_candidate_is_older() {
        let error = resolve(&["node18", "python3.9"]).expect_err("mixed families");
        assert_eq!(
            error,
            RuntimeError::MixedFamily {
                expected: "node".to_string(),
                found: "python".to_string(),
                runtime: "python3.9".to_string(),
            }
        );

        let error = resolve(&["node18", "node20", "java8"]).expect_err("mixed families");
        assert!(matches!(error, RuntimeError::MixedFamily { .. }));
    }

    #[test]
    fn unparseable_candidate_propagates() {
        let error = resolve(&["node18", "provided.al2"]).expect_err("bad identifier");
        assert!(matches!(
            error,
            RuntimeError::UnparseableRuntimeIdentifier { ref identifier, .. } if identifier == "provided.al2"
        ));
    }

    #[test]
    fn aliases_share_a_family_and_ties_keep_first_spelling() {
        let registry = RuntimeRegistry::new()
            .with_alias("node", "nodejs")
            .expect("alias");

        let latest = determine_latest_runtime_from_names(
            &["node18", "nodejs18.x", "nodejs16.x"],
            &registry,
        )
        .expect("aliases resolve to one family");
        assert_eq!(latest.name(), "node18");

        let latest = determine_latest_runtime_from_names(&["nodejs18.x", "node18"], &registry)
            .expect("aliases resolve to one family");
        assert_eq!(latest.name(), "nodejs18.x");

        let error = resolve(&["node18", "nodejs18.x"]).expect_err("no alias without catalog");
        assert!(matches!(error, RuntimeError::MixedFamily { .. }));
    }

    #[test]
    fn deprecated_latest_fails_without_fallback() {
        let registry = RuntimeRegistry::new()
            .with_deprecated("nodejs16.x")
            .expect("deprecated entry");

        let error = determine_latest_runtime_from_names(&["nodejs14.x", "nodejs16.x"], &registry)
            .expect_err("latest is deprecated");
        assert_eq!(
            error,
            RuntimeError::DeprecatedRuntime {
                runtime: "nodejs16.x".to_string()
            }
        );

        let latest = determine_latest_runtime_from_names(
            &["nodejs14.x", "nodejs16.x", "nodejs20.x"],
            &registry,
        )
        .expect("latest is supported");
        assert_eq!(latest.name(), "nodejs20.x");
    }

    #[test]
    fn resolution_is_idempotent() {
        let names = ["python3.8", "python3.12", "python3.10"];
        let first = resolve(&names).expect("resolution should pass");
        let second = resolve(&names).expect("resolution should pass");
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::catalog::RuntimeRegistry;
    use proptest::prelude::*;

    fn runtime_name() -> impl Strategy<Value = String> {
        (0u32..40, prop::option::of(0u32..20)).prop_map(|(major, minor)| match minor {
            Some(minor) => format!("nodejs{major}.{minor}"),
            None => format!("nodejs{major}.x"),
        })
    }

    fn candidates() -> impl Strategy<Value = Vec<RuntimeIdentifier>> {
        prop::collection::vec(runtime_name(), 1..12).prop_map(|names| {
            names
                .iter()
                .filter_map(|name| RuntimeIdentifier::parse(name).ok())
                .collect()
        })
    }

    proptest! {
        /// The result is always one of the candidates.
        #[test]
        fn result_is_member_of_candidates(candidates in candidates()) {
            let latest = determine_latest_runtime(&candidates, &RuntimeRegistry::new()).unwrap();
            prop_assert!(candidates.contains(&latest));
        }

        /// No candidate has a higher version than the result.
        #[test]
        fn result_is_maximal(candidates in candidates()) {
            let latest = determine_latest_runtime(&candidates, &RuntimeRegistry::new()).unwrap();
            for candidate in &candidates {
                prop_assert!(latest.version() >= candidate.version());
            }
        }

        /// Repeated and reordered resolutions agree on the winning version.
        #[test]
        fn result_is_stable_under_repetition_and_order(candidates in candidates()) {
            let registry = RuntimeRegistry::new();
            let first = determine_latest_runtime(&candidates, &registry).unwrap();
            let second = determine_latest_runtime(&candidates, &registry).unwrap();
            prop_assert_eq!(&first, &second);

            let mut reversed = candidates.clone();
            reversed.reverse();
            let from_reversed = determine_latest_runtime(&reversed, &registry).unwrap();
            prop_assert_eq!(first.version(), from_reversed.version());
        }
    }
}
