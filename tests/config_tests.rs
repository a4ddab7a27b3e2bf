//! Config loading, environment overrides and validation

use std::path::PathBuf;

use serial_test::serial;

use blockfall::config::{ENV_FALL_INTERVAL, ENV_SEED};
use blockfall::{ConfigError, Game, GameConfig};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blockfall-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn clear_env() {
    std::env::remove_var(ENV_FALL_INTERVAL);
    std::env::remove_var(ENV_SEED);
}

mod loading {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();

        assert_eq!(config.fall_interval, 1.0);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.seed, None);
        assert_eq!(config.release_grace_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = write_temp("partial", r#"{ "fall_interval": 0.5, "seed": 9 }"#);

        let config = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.fall_interval, 0.5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = write_temp("malformed", "{ fall_interval: ");

        let result = GameConfig::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("blockfall-does-not-exist.json");

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Io { .. })));
    }
}

mod validation {
    use super::*;

    #[test]
    fn rejects_non_positive_fall_interval() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = GameConfig {
                fall_interval: bad,
                ..GameConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidFallInterval(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_frame_rate() {
        for bad in [0, 1001] {
            let config = GameConfig {
                frame_rate: bad,
                ..GameConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidFrameRate(_))
            ));
        }
    }
}

mod environment {
    use super::*;

    #[test]
    #[serial]
    fn env_overrides_file_values() {
        clear_env();
        std::env::set_var(ENV_FALL_INTERVAL, "0.25");
        std::env::set_var(ENV_SEED, "77");

        let mut config = GameConfig {
            fall_interval: 2.0,
            ..GameConfig::default()
        };
        let result = config.apply_env();
        clear_env();

        assert!(result.is_ok());
        assert_eq!(config.fall_interval, 0.25);
        assert_eq!(config.seed, Some(77));
    }

    #[test]
    #[serial]
    fn unset_env_leaves_config_alone() {
        clear_env();

        let mut config = GameConfig::default();
        config.apply_env().unwrap();

        assert_eq!(config, GameConfig::default());
    }

    #[test]
    #[serial]
    fn unparsable_env_is_reported() {
        clear_env();
        std::env::set_var(ENV_SEED, "not-a-number");

        let mut config = GameConfig::default();
        let result = config.apply_env();
        clear_env();

        match result {
            Err(ConfigError::InvalidEnv { name, value }) => {
                assert_eq!(name, ENV_SEED);
                assert_eq!(value, "not-a-number");
            }
            other => panic!("expected InvalidEnv, got {other:?}"),
        }
    }
}

mod seeding {
    use super::*;

    #[test]
    fn same_seed_gives_same_piece_order() {
        let config = GameConfig {
            seed: Some(1234),
            ..GameConfig::default()
        };
        let mut a = Game::new(&config);
        let mut b = Game::new(&config);

        for _ in 0..20 {
            assert_eq!(a.active().kind, b.active().kind);
            assert_eq!(a.next_piece(), b.next_piece());
            a.hard_drop();
            b.hard_drop();
            if a.is_game_over() {
                assert!(b.is_game_over());
                a.reset();
                b.reset();
            }
        }
    }
}
