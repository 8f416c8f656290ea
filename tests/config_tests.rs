#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use csv_viewer::config::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.trigger_fraction, 0.8);
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.default_dir, default_download_dir());
    }

    #[test]
    fn test_args_without_flags() {
        let args = Args::try_parse_from(["csv-viewer"]).unwrap();
        assert_eq!(args.path, None);
        let config = ViewerConfig::from_args(&args);
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_args_with_flags() {
        let args = Args::try_parse_from([
            "csv-viewer",
            "data.csv",
            "--chunk-size",
            "250",
            "--trigger",
            "0.5",
            "--delimiter",
            ";",
            "--dir",
            "/tmp/csvs",
        ])
        .unwrap();
        assert_eq!(args.path, Some(PathBuf::from("data.csv")));

        let config = ViewerConfig::from_args(&args);
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.trigger_fraction, 0.5);
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.default_dir, Some(PathBuf::from("/tmp/csvs")));
    }

    #[test]
    fn test_invalid_args_rejected() {
        assert!(Args::try_parse_from(["csv-viewer", "--chunk-size", "0"]).is_err());
        assert!(Args::try_parse_from(["csv-viewer", "--chunk-size", "many"]).is_err());
        assert!(Args::try_parse_from(["csv-viewer", "--trigger", "1.5"]).is_err());
        assert!(Args::try_parse_from(["csv-viewer", "--delimiter", "ab"]).is_err());
    }

    #[test]
    fn test_parse_chunk_size() {
        assert_eq!(parse_chunk_size("1"), Ok(1));
        assert_eq!(parse_chunk_size(" 42 "), Ok(42));
        assert!(parse_chunk_size("0").is_err());
        assert!(parse_chunk_size("-3").is_err());
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("1"), Ok(1.0));
        assert_eq!(parse_fraction("0.25"), Ok(0.25));
        assert!(parse_fraction("0").is_err());
        assert!(parse_fraction("1.01").is_err());
        assert!(parse_fraction("NaN").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(','));
        assert_eq!(parse_delimiter("|"), Ok('|'));
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter(";;").is_err());
    }
}
