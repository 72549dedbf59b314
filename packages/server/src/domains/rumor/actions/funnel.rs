//! Query funnel: progressive narrowing of the rumor space.
//!
//! Each step fixes one more criterion and asks the store for the next
//! candidate set. Empty sets are normal terminal outcomes ("no matches"),
//! never errors, and there is no backtracking - revising a choice means
//! exiting and restarting the flow.
//!
//! Matching fields are lowercased here as well as at write time, so the
//! funnel is case-insensitive regardless of what callers pass in.

use anyhow::Result;

use crate::kernel::ServerDeps;

/// Cities with at least one rumor about `name surname`, deduplicated and
/// sorted ascending.
pub async fn resolve_cities(name: &str, surname: &str, deps: &ServerDeps) -> Result<Vec<String>> {
    deps.rumors
        .distinct_cities(&name.to_lowercase(), &surname.to_lowercase())
        .await
}

/// Ages with at least one rumor matching the extended criteria,
/// deduplicated and sorted ascending.
pub async fn resolve_ages(
    name: &str,
    surname: &str,
    city: &str,
    deps: &ServerDeps,
) -> Result<Vec<i64>> {
    deps.rumors
        .distinct_ages(
            &name.to_lowercase(),
            &surname.to_lowercase(),
            &city.to_lowercase(),
        )
        .await
}

/// All rumor texts for the fully fixed criteria, in submission order.
/// Duplicates are preserved: several people may have submitted the same
/// thing and each submission counts.
pub async fn resolve_texts(
    name: &str,
    surname: &str,
    city: &str,
    age: i64,
    deps: &ServerDeps,
) -> Result<Vec<String>> {
    deps.rumors
        .texts(
            &name.to_lowercase(),
            &surname.to_lowercase(),
            &city.to_lowercase(),
            age,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::rumor::models::NewRumor;
    use crate::kernel::{MockRumorStore, TestDependencies};

    fn rumor(name: &str, surname: &str, city: &str, age: i64, text: &str) -> NewRumor {
        NewRumor {
            name: name.to_string(),
            surname: surname.to_string(),
            city: city.to_string(),
            age,
            subject_username: None,
            text: text.to_string(),
        }
    }

    fn seeded_deps() -> TestDependencies {
        TestDependencies::with_rumors(
            MockRumorStore::new()
                .with_rumor(rumor("Ivan", "Petrov", "Moscow", 30, "first"))
                .with_rumor(rumor("ivan", "petrov", "moscow", 30, "second"))
                .with_rumor(rumor("ivan", "petrov", "kazan", 41, "elsewhere"))
                .with_rumor(rumor("anna", "petrova", "moscow", 25, "unrelated")),
        )
    }

    #[tokio::test]
    async fn cities_are_deduplicated_sorted_and_case_insensitive() {
        let test_deps = seeded_deps();
        let deps = test_deps.server_deps();

        let cities = resolve_cities("IVAN", "Petrov", &deps).await.unwrap();
        assert_eq!(cities, vec!["kazan".to_string(), "moscow".to_string()]);
    }

    #[tokio::test]
    async fn no_matches_resolves_to_an_empty_set() {
        let test_deps = seeded_deps();
        let deps = test_deps.server_deps();

        let cities = resolve_cities("nobody", "nowhere", &deps).await.unwrap();
        assert!(cities.is_empty());
    }

    #[tokio::test]
    async fn exact_criteria_return_texts_in_submission_order() {
        let test_deps = seeded_deps();
        let deps = test_deps.server_deps();

        let ages = resolve_ages("ivan", "petrov", "Moscow", &deps).await.unwrap();
        assert_eq!(ages, vec![30]);

        let texts = resolve_texts("ivan", "petrov", "moscow", 30, &deps)
            .await
            .unwrap();
        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn narrowing_is_monotonic() {
        let test_deps = seeded_deps();
        let deps = test_deps.server_deps();

        // Every age offered for every offered city must lead to a
        // non-empty text set.
        let cities = resolve_cities("ivan", "petrov", &deps).await.unwrap();
        assert!(!cities.is_empty());
        for city in &cities {
            let ages = resolve_ages("ivan", "petrov", city, &deps).await.unwrap();
            assert!(!ages.is_empty());
            for age in ages {
                let texts = resolve_texts("ivan", "petrov", city, age, &deps)
                    .await
                    .unwrap();
                assert!(!texts.is_empty());
            }
        }
    }
}
