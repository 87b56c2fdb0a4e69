//! Conversion table properties across the whole published grid.

#[cfg(test)]
mod tests {
    use handicap_ev::handicap::table::EMBEDDED_TABLE;
    use handicap_ev::handicap::ConversionTable;
    use handicap_ev::types::ErrorKind;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn table() -> ConversionTable {
        ConversionTable::embedded().unwrap()
    }

    #[test]
    fn test_every_grid_point_round_trips() {
        let table = table();
        let mut expected = Decimal::ZERO;
        for (market, label) in table.entries() {
            assert_eq!(market.value(), expected);
            assert_eq!(table.to_market(label).unwrap(), market, "{label}");
            assert_eq!(table.to_regional(market.value()).unwrap(), label);
            assert!(table.round_trips(label), "{label}");
            assert!(!table.is_alias(label), "{label}");
            expected += dec!(0.05);
        }
        assert_eq!(expected, dec!(4.05));
    }

    #[test]
    fn test_slash_aliases_resolve_to_tenths_labels() {
        let table = table();
        for digit in 1..=9 {
            let alias = format!("0/{digit}");
            let tenths = format!("0.{digit}");
            assert_eq!(
                table.to_market(&alias).unwrap(),
                table.to_market(&tenths).unwrap(),
                "{alias}"
            );
            assert_eq!(table.canonical_label(&alias).unwrap(), tenths);
            assert!(table.is_alias(&alias));
            assert!(table.round_trips(&alias));
        }
    }

    #[test]
    fn test_overrides_kept_verbatim() {
        let table = table();
        assert_eq!(table.to_regional(dec!(1.25)).unwrap(), "1.25");
        assert_eq!(table.to_regional(dec!(1.50)).unwrap(), "1.5");
        assert_eq!(table.to_market("1.5").unwrap().value(), dec!(1.50));
        assert_eq!(
            table.to_market("1半").unwrap_err().kind(),
            ErrorKind::Conversion
        );
    }

    #[test]
    fn test_shorthand_and_width_forms() {
        let table = table();
        assert_eq!(table.to_market("17").unwrap().value(), dec!(1.35));
        assert_eq!(table.to_market("02").unwrap(), table.to_market("0.2").unwrap());
        assert_eq!(table.to_market("１．８").unwrap().value(), dec!(1.40));
        assert_eq!(table.to_market(" 2半 ").unwrap().value(), dec!(2.50));
        assert_eq!(table.canonical_label("4.0").unwrap(), "4");
    }

    #[test]
    fn test_to_regional_snaps_and_bounds() {
        let table = table();
        assert_eq!(table.to_regional(dec!(1.26)).unwrap(), "1.25");
        assert_eq!(table.to_regional(dec!(0.025)).unwrap(), "0.1");
        assert_eq!(
            table.to_regional(dec!(4.05)).unwrap_err().kind(),
            ErrorKind::Conversion
        );
        assert_eq!(
            table.to_regional(dec!(-0.05)).unwrap_err().kind(),
            ErrorKind::Conversion
        );
    }

    #[test]
    fn test_load_external_copy() {
        let path = std::env::temp_dir().join(format!("table-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, EMBEDDED_TABLE).unwrap();
        let loaded = ConversionTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let embedded = table();
        assert_eq!(loaded.version(), embedded.version());
        assert_eq!(loaded.len(), 81);
        assert_eq!(loaded.alias_count(), embedded.alias_count());
        assert!(loaded.entries().eq(embedded.entries()));
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let missing = "version = \"t\"\n[[lines]]\nmarket = 0.0\nlabel = \"0\"\n";
        let err = ConversionTable::from_toml_str(missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
