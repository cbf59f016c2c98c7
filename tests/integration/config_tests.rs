use clap::Parser;
use dupewise::cli::{Cli, Commands};
use dupewise::config::Config;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::{Figment, Jail};
use std::path::Path;

#[test]
fn test_config_load_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dupewise.toml",
            r#"
min_size = 100
max_size = 1048576
extensions = [".JPG", "png"]
max_depth = 8
follow_symlinks = true
io_threads = 2
"#,
        )?;

        let config = Config::load(Some(Path::new("dupewise.toml"))).map_err(|e| *e)?;

        assert_eq!(config.min_size, 100);
        assert_eq!(config.max_size, Some(1_048_576));
        assert_eq!(config.max_depth, 8);
        assert!(config.follow_symlinks);
        assert_eq!(config.io_threads, 2);

        let walker = config.walker_config();
        assert_eq!(walker.extensions, vec![".jpg".to_string(), ".png".to_string()]);
        Ok(())
    });
}

#[test]
fn test_config_env_beats_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupewise.toml", "min_size = 100\nmax_depth = 8")?;
        jail.set_env("DUPEWISE_MIN_SIZE", "4096");

        let config = Config::load(Some(Path::new("dupewise.toml"))).map_err(|e| *e)?;

        assert_eq!(config.min_size, 4096);
        assert_eq!(config.max_depth, 8);
        Ok(())
    });
}

#[test]
fn test_cli_beats_env_and_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupewise.toml", "min_size = 100\nio_threads = 2")?;
        jail.set_env("DUPEWISE_MIN_SIZE", "4096");

        let cli = Cli::try_parse_from([
            "dupewise",
            "scan",
            "--config",
            "dupewise.toml",
            "--min-size",
            "1KiB",
        ])
        .expect("valid arguments");
        let Commands::Scan(args) = cli.command;

        let config = args.apply_to(Config::load(args.config.as_deref()).map_err(|e| *e)?);

        assert_eq!(config.min_size, 1024);
        assert_eq!(config.io_threads, 2);
        Ok(())
    });
}

#[test]
fn test_config_invalid_toml_is_error() {
    Jail::expect_with(|jail| {
        jail.create_file("broken.toml", "min_size = = 3")?;
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("broken.toml"));
        assert!(figment.extract::<Config>().is_err());
        Ok(())
    });
}

#[test]
fn test_unrelated_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("OTHERTOOL_MIN_SIZE", "5");
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("DUPEWISE_"))
            .extract()?;
        assert_eq!(config, Config::default());
        Ok(())
    });
}
