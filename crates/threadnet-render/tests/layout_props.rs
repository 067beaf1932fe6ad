//! Property tests for figure geometry that needs no font backend.

use proptest::prelude::*;
use threadnet_graph::InteractionGraph;
use threadnet_render::Layout;
use threadnet_render::charts::histogram;

fn arb_graph() -> impl Strategy<Value = InteractionGraph> {
    prop::collection::vec((0_u8..12, 0_u8..12, 1_u8..5), 1..30).prop_map(|edges| {
        InteractionGraph::from_edges(
            edges
                .into_iter()
                .map(|(a, b, w)| (format!("u{a}"), format!("t{b}"), f64::from(w))),
        )
    })
}

proptest! {
    #[test]
    fn histogram_counts_every_finite_value(
        values in prop::collection::vec(-1e6_f64..1e6, 0..200),
        bins in 1_usize..60,
    ) {
        let h = histogram(&values, bins);
        prop_assert_eq!(h.counts.len(), bins);
        prop_assert_eq!(h.edges.len(), bins + 1);
        prop_assert_eq!(h.counts.iter().sum::<usize>(), values.len());
        prop_assert!(h.edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn layouts_are_centred_and_bounded(graph in arb_graph(), seed in any::<u64>()) {
        for layout in [Layout::Spring, Layout::Circular, Layout::KamadaKawai] {
            let pos = layout.positions(&graph, seed);
            prop_assert_eq!(pos.len(), graph.node_count());
            for &(x, y) in &pos {
                prop_assert!(x.is_finite() && y.is_finite());
                prop_assert!(x.abs() <= 1.0 + 1e-9 && y.abs() <= 1.0 + 1e-9);
            }
        }
    }
}
