//! Performance benchmarks for page accumulation.
//!
//! Measures driving the pagination engine through many pages, with the
//! default concatenating merge and with a distinct-preserving combiner.
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use moor::adapters::mock::{MockOutcome, MockPageSource};
use moor::binding::AttachmentHub;
use moor::paging::{Pager, PagerConfig};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| Runtime::new().expect("tokio runtime"));

const PAGE_SIZE: i64 = 50;

/// Script `pages` consecutive pages of `PAGE_SIZE` items each.
fn scripted_source(pages: usize) -> MockPageSource {
    let source = MockPageSource::new();
    for page in 0..pages {
        let start = page as i64 * PAGE_SIZE;
        let items = (start..start + PAGE_SIZE).collect();
        let cursor = (page + 1 < pages).then(|| format!("p{}", page + 1));
        if page == 0 {
            source.push_initial(MockOutcome::page(items, cursor));
        } else {
            source.push_after(MockOutcome::page(items, cursor));
        }
    }
    source
}

/// Drive a pager through every scripted page and return the final count.
async fn drain_pager(pages: usize, config: PagerConfig<MockPageSource>) -> usize {
    let source = scripted_source(pages);
    let hub = AttachmentHub::new();
    let pager = Pager::spawn(source, config.start_with(None), &hub);
    let mut data = pager.data();

    // wait_for instead of changed: the driver may already have merged a
    // page before this receiver looks.
    let mut expected = PAGE_SIZE as usize;
    data.wait_for(|d| d.len() >= expected)
        .await
        .expect("first page");
    for _ in 1..pages {
        pager.next_page();
        expected += PAGE_SIZE as usize;
        data.wait_for(|d| d.len() >= expected)
            .await
            .expect("next page");
    }
    let total = data.borrow().len();
    hub.close();
    total
}

fn bench_concat_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pager_concat");
    for pages in [10usize, 50, 100] {
        group.throughput(Throughput::Elements(pages as u64 * PAGE_SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, &pages| {
            b.iter(|| {
                let total = RUNTIME.block_on(drain_pager(pages, PagerConfig::new()));
                assert_eq!(total, pages * PAGE_SIZE as usize);
            });
        });
    }
    group.finish();
}

fn bench_distinct_accumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pager_distinct");
    for pages in [10usize, 50] {
        group.throughput(Throughput::Elements(pages as u64 * PAGE_SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, &pages| {
            b.iter(|| {
                let config = PagerConfig::new().combine_with(|mut acc: Vec<i64>, new| {
                    for item in new {
                        if !acc.contains(&item) {
                            acc.push(item);
                        }
                    }
                    acc
                });
                let total = RUNTIME.block_on(drain_pager(pages, config));
                assert_eq!(total, pages * PAGE_SIZE as usize);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_concat_accumulation,
    bench_distinct_accumulation
);
criterion_main!(benches);
