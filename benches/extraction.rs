// benches/extraction.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::HashMap;

use ebird_compiler::app::services::checklist_parser::ChecklistExtractor;
use ebird_compiler::app::services::compiler::compile_records;
use ebird_compiler::constants::markers;

const SPECIES_PER_PAGE: u32 = 300;

/// Large synthetic checklist: a shared checklist with two sub-lists
fn build_page() -> String {
    let mut html = String::from("<html><body>\n");
    html.push_str(&format!("{}2021-05-15T06:30\">May 15</time>\n", markers::DATE_OPEN));
    html.push_str(&format!("{}<span>Central Park</span>\n", markers::LOCATION_LABEL));
    html.push_str(&format!("{}<span>Observer One</span>\n", markers::OWNER_LABEL));
    html.push_str(&format!(
        "<h6>{}</h6><ul class=\"Breadcrumbs\">\n",
        markers::OTHER_PARTICIPANTS_LABEL
    ));
    for i in 0..5 {
        html.push_str(&format!("<li>{}Observer {}</span></li>\n", markers::PARTICIPANT_OPEN, i));
    }
    html.push_str("</ul>\n");
    html.push_str(&format!("{}Traveling</span>\n", markers::PROTOCOL_OPEN));
    html.push_str(&format!("{}3 h, 10 min</span>\n", markers::DURATION_OPEN));
    html.push_str(&format!("{}4.2 km</span>\n", markers::DISTANCE_OPEN));

    html.push_str(markers::SPECIES_LIST_START);
    for i in 0..SPECIES_PER_PAGE {
        if i == SPECIES_PER_PAGE / 2 {
            html.push_str(&format!("{}Additional species</h3>\n", markers::ADDITIONAL_SPECIES));
        }
        html.push_str(&format!(
            "{}<h5>{}Species {}</span></h5><div>{}<span>{}</span></div>{}\n",
            markers::SECTION_OPEN,
            markers::SPECIES_NAME_OPEN,
            i % 200,
            markers::NUMBER_OBSERVED_LABEL,
            i % 17 + 1,
            markers::SECTION_CLOSE
        ));
    }
    html.push_str("</div>");
    html.push_str(markers::SPECIES_LIST_END);
    html.push_str("</div></body></html>\n");
    html
}

fn build_taxonomy() -> HashMap<String, u32> {
    (0..200).map(|i| (format!("Species {}", i), i * 10)).collect()
}

fn bench_extraction(c: &mut Criterion) {
    let page = build_page();
    let taxonomy = build_taxonomy();
    let extractor = ChecklistExtractor::new(&taxonomy);

    c.bench_function("extract_checklist", |b| {
        b.iter(|| {
            let record = extractor.extract("S1", black_box(&page)).unwrap();
            black_box(record.species.len())
        })
    });

    let records: Vec<_> = (0..50)
        .map(|i| extractor.extract(&format!("S{}", i), &page).unwrap())
        .collect();

    c.bench_function("compile_50_checklists", |b| {
        b.iter(|| {
            let compiled = compile_records(black_box(&records)).unwrap();
            black_box(compiled.summary.species.len())
        })
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
