//! Shared read-only use from many threads and from the async batch runner.

#[cfg(test)]
mod tests {
    use crate::{evaluator, sample_curve};
    use handicap_ev::batch::{run_batch, BatchOutcome, SlipRequest};
    use handicap_ev::pricing::LineInterpolator;
    use handicap_ev::types::{ErrorKind, Side};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    static TOKENS: [&str; 6] = ["0", "0.5", "1", "1.5", "1半5", "2"];

    fn request(id: &str, token: &str) -> SlipRequest {
        SlipRequest {
            id: id.to_string(),
            token: token.to_string(),
            favored: Side::Home,
            curve: sample_curve(),
        }
    }

    #[test]
    fn test_shared_evaluator_across_threads() {
        let shared = Arc::new(evaluator());
        let curve = Arc::new(sample_curve());

        let expected: Vec<f64> = TOKENS
            .iter()
            .map(|t| {
                shared
                    .evaluate(t, Side::Home, &curve)
                    .unwrap()
                    .favorite
                    .ev
                    .ev_pct_rebate
            })
            .collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let curve = Arc::clone(&curve);
                thread::spawn(move || {
                    (0..50)
                        .flat_map(|_| TOKENS.iter())
                        .map(|t| {
                            shared
                                .evaluate(t, Side::Home, &curve)
                                .unwrap()
                                .favorite
                                .ev
                                .ev_pct_rebate
                        })
                        .collect::<Vec<f64>>()
                })
            })
            .collect();

        for handle in handles {
            let results = handle.join().unwrap();
            for (i, ev) in results.iter().enumerate() {
                assert_eq!(*ev, expected[i % TOKENS.len()]);
            }
        }
    }

    #[test]
    fn test_fine_grid_is_shared_immutably() {
        let grid = Arc::new(
            LineInterpolator::default()
                .market_grid(&sample_curve())
                .unwrap(),
        );
        // -2.5..=1 in 0.05 steps.
        assert_eq!(grid.len(), 71);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let grid = Arc::clone(&grid);
                thread::spawn(move || grid.probability(dec!(-1.25), Side::Home))
            })
            .collect();
        let first = grid.probability(dec!(-1.25), Side::Home);
        assert!(first.is_some());
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_tags_failures() {
        let requests = vec![
            request("a", "1.5"),
            request("b", "not-a-line"),
            request("c", "0.5"),
            request("d", "3"),
        ];

        let report = run_batch(Arc::new(evaluator()), requests).await.unwrap();

        assert_eq!(report.evaluated, 2);
        assert_eq!(report.failed, 2);
        let ids: Vec<&str> = report.outcomes.iter().map(|o| o.id()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);

        match &report.outcomes[1] {
            BatchOutcome::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::Conversion),
            other => panic!("expected failure, got {other:?}"),
        }
        match &report.outcomes[3] {
            BatchOutcome::Failed { kind, .. } => {
                assert_eq!(*kind, ErrorKind::InterpolationRange)
            }
            other => panic!("expected failure, got {other:?}"),
        }
        match &report.outcomes[0] {
            BatchOutcome::Evaluated { evaluation, .. } => {
                assert_eq!(evaluation.market_line.value(), dec!(1.50));
            }
            other => panic!("expected evaluation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_large_batch_matches_sequential() {
        let evaluator = Arc::new(evaluator());
        let requests: Vec<SlipRequest> = (0..200)
            .map(|i| request(&format!("r{i}"), TOKENS[i % TOKENS.len()]))
            .collect();

        let report = run_batch(Arc::clone(&evaluator), requests.clone())
            .await
            .unwrap();
        assert_eq!(report.outcomes.len(), 200);
        assert_eq!(report.failed, 0);
        assert_eq!(report.table_version, evaluator.table().version());

        for (request, outcome) in requests.iter().zip(&report.outcomes) {
            let BatchOutcome::Evaluated { evaluation, .. } = outcome else {
                panic!("unexpected failure for {}", request.id);
            };
            let direct = evaluator
                .evaluate(&request.token, request.favored, &request.curve)
                .unwrap();
            assert_eq!(evaluation, &direct);
        }
    }
}
