//! Filtering, searching and sorting of the lead list

use coldcall_crm::view::{distinct_cities, filter_and_sort};
use coldcall_crm::{FilterState, Lead, LeadStatus, SortKey};
use proptest::prelude::*;

fn lead(id: &str, title: Option<&str>, city: Option<&str>) -> Lead {
    Lead {
        id: id.to_string(),
        title: title.map(String::from),
        city: city.map(String::from),
        ..Lead::default()
    }
}

fn ids<'a>(leads: &[&'a Lead]) -> Vec<&'a str> {
    leads.iter().map(|l| l.id.as_str()).collect()
}

fn sample() -> Vec<Lead> {
    vec![
        Lead {
            reviews_count: 50,
            total_score: Some(4.9),
            website: Some("https://a.fr".to_string()),
            status: LeadStatus::CallBack,
            ..lead("a", Some("Coach Fit"), Some("Nantes"))
        },
        Lead {
            reviews_count: 3,
            total_score: None,
            ..lead("b", Some("Studio Zen"), Some("Rezé"))
        },
        Lead {
            reviews_count: 20,
            total_score: Some(3.5),
            website: Some(String::new()),
            status: LeadStatus::NoAnswer,
            ..lead("c", None, Some("Nantes"))
        },
        Lead {
            reviews_count: 20,
            total_score: Some(-1.0),
            ..lead("d", Some("Box Nantes Est"), None)
        },
    ]
}

#[test]
fn test_default_view_sorts_by_reviews_ascending() {
    let leads = sample();
    let visible = filter_and_sort(&leads, &FilterState::default());
    // c and d tie on reviews and keep their input order
    assert_eq!(ids(&visible), vec!["b", "c", "d", "a"]);
}

#[test]
fn test_search_matches_title_or_city() {
    let leads = sample();
    let filters = FilterState {
        search_query: "nantes".to_string(),
        ..FilterState::default()
    };
    // c matches on city despite having no title, d matches on title despite having no city
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["c", "d", "a"]);
}

#[test]
fn test_search_never_matches_missing_fields() {
    let leads = vec![lead("x", None, None)];
    let filters = FilterState {
        search_query: "a".to_string(),
        ..FilterState::default()
    };
    assert!(filter_and_sort(&leads, &filters).is_empty());
}

#[test]
fn test_city_filter_excludes_missing_city() {
    let leads = sample();
    let mut filters = FilterState::default();
    filters.toggle_city("Nantes");
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["c", "a"]);

    filters.toggle_city("Rezé");
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["b", "c", "a"]);
}

#[test]
fn test_status_filter() {
    let leads = sample();
    let filters = FilterState {
        selected_status: Some(LeadStatus::NotCalled),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["b", "d"]);
}

#[test]
fn test_without_website_treats_empty_as_missing() {
    let leads = sample();
    let filters = FilterState {
        without_website: true,
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["b", "c", "d"]);
}

#[test]
fn test_sort_by_score_treats_missing_as_zero() {
    let leads = sample();
    let filters = FilterState {
        sort_by: SortKey::Score,
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["d", "b", "c", "a"]);
}

#[test]
fn test_sort_by_city_treats_missing_as_empty() {
    let leads = sample();
    let filters = FilterState {
        sort_by: SortKey::City,
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["d", "a", "c", "b"]);
}

#[test]
fn test_sort_by_status_puts_uncalled_first() {
    let leads = sample();
    let filters = FilterState {
        sort_by: SortKey::Status,
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["b", "d", "c", "a"]);
}

#[test]
fn test_sort_by_status_follows_call_progress() {
    let leads: Vec<Lead> = [
        LeadStatus::Refused,
        LeadStatus::MeetingSet,
        LeadStatus::CallBack,
        LeadStatus::NotCalled,
        LeadStatus::NoAnswer,
    ]
    .into_iter()
    .map(|status| Lead {
        id: status.as_str().to_string(),
        status,
        ..Lead::default()
    })
    .collect();
    let filters = FilterState {
        sort_by: SortKey::Status,
        ..FilterState::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&leads, &filters)),
        vec!["NotCalled", "NoAnswer", "CallBack", "MeetingSet", "Refused"]
    );
}

#[test]
fn test_sort_by_city_ignores_accents_and_case() {
    let leads = vec![
        lead("z", None, Some("Zurich")),
        lead("e", None, Some("Émerainville")),
        lead("o", None, Some("orvault")),
        lead("n", None, Some("Nantes")),
    ];
    let filters = FilterState {
        sort_by: SortKey::City,
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&leads, &filters)), vec!["e", "n", "o", "z"]);
    assert_eq!(distinct_cities(&leads), vec!["Émerainville", "Nantes", "orvault", "Zurich"]);
}

#[test]
fn test_view_does_not_mutate_input() {
    let leads = sample();
    let before = leads.clone();
    let _ = filter_and_sort(&leads, &FilterState {
        sort_by: SortKey::Score,
        ..FilterState::default()
    });
    assert_eq!(leads, before);
}

#[test]
fn test_distinct_cities_sorted() {
    assert_eq!(distinct_cities(&sample()), vec!["Nantes", "Rezé"]);
    assert!(distinct_cities(&[]).is_empty());
}

fn lead_strategy() -> impl Strategy<Value = Lead> {
    (
        "[a-z]{1,6}",
        proptest::option::of(prop::sample::select(vec!["Nantes", "Rezé", "Orvault", ""])),
        0u32..100,
        proptest::option::of(0.0f64..5.0),
        prop::sample::select(LeadStatus::ALL.to_vec()),
        any::<bool>(),
    )
        .prop_map(|(id, city, reviews, score, status, has_site)| Lead {
            title: Some(format!("Gym {id}")),
            id,
            city: city.map(String::from),
            reviews_count: reviews,
            total_score: score,
            status,
            website: has_site.then(|| "https://gym.fr".to_string()),
            ..Lead::default()
        })
}

fn filters_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop::sample::select(vec!["", "gym", "nan", "zzz"]),
        prop::collection::vec(prop::sample::select(vec!["Nantes", "Rezé", "Orvault"]), 0..3),
        proptest::option::of(prop::sample::select(LeadStatus::ALL.to_vec())),
        prop::sample::select(vec![SortKey::Reviews, SortKey::Score, SortKey::City, SortKey::Status]),
        any::<bool>(),
    )
        .prop_map(|(query, cities, status, sort_by, without_website)| FilterState {
            search_query: query.to_string(),
            selected_cities: cities.into_iter().map(String::from).collect(),
            selected_status: status,
            sort_by,
            without_website,
        })
}

// Property: the view is a sorted subset of the input, and every kept lead passes every filter
proptest! {
    #[test]
    fn view_is_filtered_subset(leads in prop::collection::vec(lead_strategy(), 0..40), filters in filters_strategy()) {
        let visible = filter_and_sort(&leads, &filters);
        prop_assert!(visible.len() <= leads.len());
        for lead in &visible {
            prop_assert!(filters.matches(lead));
        }
        let expected = leads.iter().filter(|l| filters.matches(l)).count();
        prop_assert_eq!(visible.len(), expected);
    }

    #[test]
    fn reviews_sort_is_non_decreasing(leads in prop::collection::vec(lead_strategy(), 0..40)) {
        let visible = filter_and_sort(&leads, &FilterState::default());
        for pair in visible.windows(2) {
            prop_assert!(pair[0].reviews_count <= pair[1].reviews_count);
        }
    }

    #[test]
    fn score_sort_is_non_decreasing(leads in prop::collection::vec(lead_strategy(), 0..40)) {
        let filters = FilterState { sort_by: SortKey::Score, ..FilterState::default() };
        let visible = filter_and_sort(&leads, &filters);
        for pair in visible.windows(2) {
            prop_assert!(pair[0].total_score.unwrap_or(0.0) <= pair[1].total_score.unwrap_or(0.0));
        }
    }

    #[test]
    fn filter_order_does_not_matter(leads in prop::collection::vec(lead_strategy(), 0..40), filters in filters_strategy()) {
        // Applying the status filter on an already city-filtered list gives the same view
        let city_only = FilterState {
            selected_status: None,
            ..filters.clone()
        };
        let first_pass: Vec<Lead> = filter_and_sort(&leads, &city_only).into_iter().cloned().collect();
        let second_pass = filter_and_sort(&first_pass, &filters);
        let direct = filter_and_sort(&leads, &filters);
        prop_assert_eq!(ids(&second_pass), ids(&direct));
    }
}
