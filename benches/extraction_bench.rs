use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use newsgrab::extraction::{ArticleExtractor, Document};
use url::Url;

fn container_page(n: usize) -> String {
    let mut html = String::from("<html><body><main>");
    for i in 0..n {
        html.push_str(&format!(
            r#"<article class="card"><h2 class="title">Story {i} about the local council budget</h2>
               <a href="/news/{i}">more</a><span class="byline">Desk {i}</span>
               <time datetime="2025-03-{:02}">March</time><p>{}</p></article>"#,
            i % 28 + 1,
            "Body text. ".repeat(20)
        ));
    }
    html.push_str("</main></body></html>");
    html
}

fn link_page(n: usize) -> String {
    let mut html = String::from("<html><body><ul>");
    for i in 0..n {
        html.push_str(&format!(
            r#"<li><a href="/section/{i}">Section link number {i} with a long label</a></li>"#
        ));
        html.push_str(r##"<li><a href="#top">Back to the top of the page</a></li>"##);
    }
    html.push_str("</ul></body></html>");
    html
}

fn bench_tiers(c: &mut Criterion) {
    let url = Url::parse("https://news.example.com/").unwrap();
    let extractor = ArticleExtractor::default();
    let mut group = c.benchmark_group("extract");

    let pages = [
        ("container_20", container_page(20)),
        ("container_200", container_page(200)),
        ("links_200", link_page(200)),
    ];

    for (name, html) in &pages {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_and_extract", name), html, |b, html| {
            b.iter(|| {
                let doc = Document::parse(std::hint::black_box(html));
                std::hint::black_box(extractor.extract_at(&doc, &url, Utc::now()))
            });
        });
    }

    group.finish();
}

fn bench_extract_only(c: &mut Criterion) {
    let url = Url::parse("https://news.example.com/").unwrap();
    let extractor = ArticleExtractor::default();
    let doc = Document::parse(&container_page(200));

    c.bench_function("extract_parsed_container_200", |b| {
        b.iter(|| std::hint::black_box(extractor.extract_at(&doc, &url, Utc::now())))
    });
}

criterion_group!(benches, bench_tiers, bench_extract_only);
criterion_main!(benches);
