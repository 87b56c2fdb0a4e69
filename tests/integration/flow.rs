//! Token → targets → fair probability → EV, through the public API.

#[cfg(test)]
mod tests {
    use crate::{evaluator, evaluator_with_rebate, sample_curve};
    use handicap_ev::handicap::LineTargetResolver;
    use handicap_ev::pricing::{CurvePoint, LineCurve, LineInterpolator};
    use handicap_ev::types::{ErrorKind, PricePair, Role, Side, Verdict};
    use rust_decimal_macros::dec;

    #[test]
    fn test_observed_line_reads_quoted_prices() {
        let eval = evaluator().evaluate("1.5", Side::Home, &sample_curve()).unwrap();

        assert_eq!(eval.label, "1.5");
        assert_eq!(eval.favorite.target, dec!(1.5));
        assert_eq!(eval.underdog.target, dec!(-1.5));
        assert_eq!(eval.favorite.observed_price, Some(1.92));
        assert_eq!(eval.underdog.observed_price, Some(1.92));
        assert!((eval.favorite.ev.fair_probability - 0.5).abs() < 1e-12);
        // 0.5 × 1.9 − 1 = −5%.
        assert!((eval.favorite.ev.ev_pct - -5.0).abs() < 1e-9);
        assert_eq!(eval.favorite.ev.verdict, Verdict::Minus);
    }

    #[test]
    fn test_interpolated_line_stays_between_brackets() {
        let curve = sample_curve();
        let interp = LineInterpolator::default();
        let lower = interp.fair_probability_at(&curve, dec!(-1.5), Side::Home).unwrap();
        let upper = interp.fair_probability_at(&curve, dec!(-1), Side::Home).unwrap();

        // "1.4" is market 1.20.
        let eval = evaluator().evaluate("1.4", Side::Home, &curve).unwrap();
        assert_eq!(eval.market_line.value(), dec!(1.20));
        assert!(eval.favorite.observed_price.is_none());
        let p = eval.favorite.ev.fair_probability;
        assert!(p > lower.min(upper) && p < lower.max(upper));
    }

    #[test]
    fn test_rebate_lifts_verdict() {
        // Fair 0.55 at the home -0.5 line with a symmetric margin.
        let p: f64 = 0.55;
        let margin = 1.05;
        let curve: LineCurve = vec![CurvePoint {
            line: dec!(-0.5),
            home: 1.0 / (p * margin),
            away: 1.0 / ((1.0 - p) * margin),
        }]
        .into();

        // "0半" is market 0.50.
        let plain = evaluator().evaluate("0半", Side::Home, &curve).unwrap();
        assert!((plain.favorite.ev.ev_pct - 4.5).abs() < 1e-9);
        assert_eq!(plain.favorite.ev.verdict, Verdict::Plus);

        let rebated = evaluator_with_rebate(dec!(0.015))
            .evaluate("0半", Side::Home, &curve)
            .unwrap();
        assert_eq!(rebated.favorite.ev.effective_payout, dec!(1.915));
        assert!((rebated.favorite.ev.ev_pct_rebate - 5.325).abs() < 1e-9);
        assert_eq!(rebated.favorite.ev.verdict, Verdict::ClearPlus);
    }

    #[test]
    fn test_favorite_assignment_is_symmetric() {
        // Mirror the curve: home at k becomes away at -k.
        let home_curve = sample_curve();
        let away_curve: LineCurve = home_curve
            .iter()
            .map(|(k, pair)| CurvePoint {
                line: -k,
                home: pair.away,
                away: pair.home,
            })
            .collect();

        for token in ["1", "1.5", "2", "0.5", "1.8", "0半5"] {
            let h = evaluator().evaluate(token, Side::Home, &home_curve).unwrap();
            let a = evaluator().evaluate(token, Side::Away, &away_curve).unwrap();

            assert_eq!(h.favorite.curve_key, -a.favorite.curve_key, "{token}");
            assert_eq!(h.favorite.target, a.favorite.target, "{token}");
            for role in [Role::Favorite, Role::Underdog] {
                let (hs, as_) = match role {
                    Role::Favorite => (&h.favorite, &a.favorite),
                    Role::Underdog => (&h.underdog, &a.underdog),
                };
                assert_eq!(hs.side, as_.side.opposite());
                assert!(
                    (hs.ev.fair_probability - as_.ev.fair_probability).abs() < 1e-12,
                    "{token} {role:?}"
                );
            }
        }
    }

    #[test]
    fn test_resolver_and_evaluator_agree() {
        let targets = LineTargetResolver::resolve(dec!(2), Side::Away);
        let eval = evaluator().evaluate("2", Side::Away, &sample_curve());
        // Away giving 2 needs home key +2, beyond this curve's top.
        assert_eq!(targets.curve_key(Role::Favorite), dec!(2));
        assert_eq!(eval.unwrap_err().kind(), ErrorKind::InterpolationRange);
    }

    #[test]
    fn test_bad_price_surfaces_invalid_price() {
        let curve: LineCurve = vec![
            CurvePoint { line: dec!(-1), home: 1.0, away: 3.0 },
            CurvePoint { line: dec!(0), home: 1.5, away: 2.6 },
        ]
        .into();
        let err = evaluator().evaluate("0.5", Side::Home, &curve).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPrice);
    }

    #[test]
    fn test_legacy_zero_line_fallback() {
        let curve: LineCurve = vec![
            CurvePoint { line: dec!(-1), home: 1.90, away: 1.90 },
            CurvePoint { line: dec!(1), home: 1.25, away: 4.00 },
        ]
        .into();

        let on = LineInterpolator::new(true)
            .fair_probability_at(&curve, dec!(0), Side::Home)
            .unwrap();
        let off = LineInterpolator::new(false)
            .fair_probability_at(&curve, dec!(0), Side::Home)
            .unwrap();
        // With only ±1 quoted both paths see the same two points.
        assert!((on - off).abs() < 1e-12);

        let eval = evaluator().evaluate("0", Side::Home, &curve).unwrap();
        assert!((eval.favorite.ev.fair_probability - on).abs() < 1e-12);

        // A nearer quote takes over from the ±1 pair.
        let mut closer = curve.clone();
        closer.insert(dec!(-0.5), PricePair::new(1.70, 2.15));
        let eval = evaluator().evaluate("0", Side::Home, &closer).unwrap();
        let bracketed = LineInterpolator::new(false)
            .fair_probability_at(&closer, dec!(0), Side::Home)
            .unwrap();
        assert!((eval.favorite.ev.fair_probability - bracketed).abs() < 1e-12);
        assert!((bracketed - on).abs() > 1e-6);
    }
}
