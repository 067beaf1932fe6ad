use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use threadnet_core::table::{Column, Table};
use threadnet_graph::community::{CommunityMethod, LouvainConfig, detect_communities_with};
use threadnet_graph::graph::build_interaction_graph;
use threadnet_graph::metrics::centrality_table;

/// (name, authors, topics, messages)
const TIERS: [(&str, i64, i64, usize); 3] = [
    ("small", 50, 20, 500),
    ("medium", 300, 120, 5_000),
    ("large", 1_000, 400, 20_000),
];

/// Synthetic forum: authors post in topics with a skew towards low ids.
fn synthetic_forum(authors: i64, topics: i64, messages: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut author_col = Vec::with_capacity(messages);
    let mut topic_col = Vec::with_capacity(messages);
    for _ in 0..messages {
        let a = rng.gen_range(0..authors).min(rng.gen_range(0..authors));
        let t = rng.gen_range(0..topics).min(rng.gen_range(0..topics));
        author_col.push(a);
        // Topics live in their own id range so they never collide with authors.
        topic_col.push(1_000_000 + t);
    }
    Table::from_columns(vec![
        Column::new("msg_author_id", author_col),
        Column::new("msg_topic_id", topic_col),
    ])
    .expect("synthetic table")
}

fn bench_centrality(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.tiered");
    group.sample_size(10);

    for (name, authors, topics, messages) in TIERS {
        let table = synthetic_forum(authors, topics, messages, 0xF0_2024);
        group.throughput(Throughput::Elements(messages as u64));

        group.bench_with_input(BenchmarkId::new("build", name), &table, |b, table| {
            b.iter(|| {
                black_box(build_interaction_graph(table, "msg_author_id", "msg_topic_id", None))
            });
        });

        let graph = build_interaction_graph(&table, "msg_author_id", "msg_topic_id", None)
            .expect("build graph");

        group.bench_with_input(BenchmarkId::new("centrality_table", name), &graph, |b, g| {
            b.iter(|| black_box(centrality_table(g)));
        });

        let config = LouvainConfig {
            seed: Some(7),
            ..LouvainConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("louvain", name), &graph, |b, g| {
            b.iter(|| black_box(detect_communities_with(g, CommunityMethod::Louvain, &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_centrality);
criterion_main!(benches);
