#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_defaults_use_standard_file_names() {
        let config = Config::default();
        let files = config.output_files(None).unwrap();
        assert_eq!(files.detailed, PathBuf::from("./results/Detailed_MCDA_Data.csv"));
        assert_eq!(files.pivot, PathBuf::from("./results/Risk_Scores_Pivot.csv"));
        assert_eq!(files.final_table, PathBuf::from("./results/Final_Aggregated_Risk_Scores.csv"));
        assert!(files.log_pivot.is_none());
        assert!(files.facets.is_none());
    }

    #[test]
    fn test_default_log_filter_targets_resistome() {
        assert!(default_log_filter().starts_with("resistome="));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [inputs]
            detections = "data/amr.csv"

            [output]
            dir = "out"
            write_log_pivot = true
            facet_metric = "cumulative_risk_score"
            "#,
        )
        .unwrap();

        assert_eq!(config.inputs.detections, Some(PathBuf::from("data/amr.csv")));
        assert_eq!(config.inputs.reference, None);
        assert_eq!(config.output.pivot_file, "Risk_Scores_Pivot.csv");
        assert!(config.output.write_summary);

        let files = config.output_files(Some(Path::new("override"))).unwrap();
        assert_eq!(files.log_pivot, Some(PathBuf::from("override/Log_Risk_Scores_Pivot.csv")));
        let (facets_dir, metric) = files.facets.unwrap();
        assert_eq!(facets_dir, PathBuf::from("override/facets"));
        assert_eq!(metric, FacetMetric::CumulativeRiskScore);
    }

    #[test]
    fn test_unknown_facet_metric_rejected() {
        let config = Config::from_toml("[output]\nfacet_metric = \"mortality\"\n").unwrap();
        assert!(config.output_files(None).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/resistome.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/resistome.toml"));
    }

    #[test]
    fn test_explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.output.dir, default_output_dir());
    }

    #[test]
    fn test_implicit_missing_file_falls_back_to_defaults() {
        // Only this test reads RESISTOME_CONFIG; explicit loads bypass it
        std::env::set_var("RESISTOME_CONFIG", "/nonexistent/resistome.toml");
        let config = Config::load(None);
        std::env::remove_var("RESISTOME_CONFIG");

        assert_eq!(config.unwrap().logging.filter, default_log_filter());
    }
}
