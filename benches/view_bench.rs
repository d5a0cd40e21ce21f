use coldcall_crm::view::{distinct_cities, filter_and_sort};
use coldcall_crm::{DashboardStats, FilterState, Lead, LeadStatus, SortKey};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CITIES: [&str; 5] = ["Nantes", "Rezé", "Orvault", "Saint-Herblain", "Vertou"];

fn leads(n: usize) -> Vec<Lead> {
    (0..n)
        .map(|i| Lead {
            id: format!("lead-{i}"),
            title: Some(format!("Coach {i}")),
            city: Some(CITIES[i % CITIES.len()].to_string()),
            reviews_count: u32::try_from(i * 7919 % 500).unwrap_or_default(),
            total_score: (i % 3 != 0).then(|| f64::from(u32::try_from(i % 50).unwrap_or_default()) / 10.0),
            status: LeadStatus::ALL[i % LeadStatus::ALL.len()],
            website: (i % 2 == 0).then(|| "https://example.fr".to_string()),
            ..Lead::default()
        })
        .collect()
}

fn bench_view(c: &mut Criterion) {
    let leads = leads(5_000);

    c.bench_function("filter_and_sort default", |b| {
        b.iter(|| filter_and_sort(black_box(&leads), &FilterState::default()).len());
    });

    let filters = FilterState {
        search_query: "coach 4".to_string(),
        selected_cities: vec!["Nantes".to_string(), "Rezé".to_string()],
        selected_status: None,
        sort_by: SortKey::Score,
        without_website: true,
    };
    c.bench_function("filter_and_sort search+cities", |b| {
        b.iter(|| filter_and_sort(black_box(&leads), &filters).len());
    });

    c.bench_function("distinct_cities", |b| b.iter(|| distinct_cities(black_box(&leads))));
    c.bench_function("dashboard", |b| b.iter(|| DashboardStats::from_leads(black_box(&leads))));
}

criterion_group!(benches, bench_view);
criterion_main!(benches);
