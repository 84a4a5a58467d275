use crate::commands::{BoardPaths, CmdMessage, CmdResult};
use crate::config::BoardConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Config changes take effect the next time the board is opened.
pub fn run(paths: &BoardPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = BoardConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = BoardConfig::load(dir)?;
            let message = match lookup(&config, &key) {
                Some(val) => CmdMessage::info(val),
                None => CmdMessage::error(format!("Unknown config key: {}", key)),
            };
            Ok(CmdResult::default().with_message(message))
        }
        ConfigAction::Set(key, value) => {
            let mut config = BoardConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                return Ok(CmdResult::default().with_message(CmdMessage::error(e.to_string())));
            }
            config.save(dir)?;
            let display_val = lookup(&config, &key).unwrap_or(value);
            Ok(CmdResult::default()
                .with_message(CmdMessage::success(format!("{} set to {}", key, display_val)))
                .with_config(config))
        }
    }
}

fn lookup(config: &BoardConfig, key: &str) -> Option<String> {
    config
        .entries()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn set_persists_and_show_key_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BoardPaths {
            data_dir: dir.path().to_path_buf(),
        };

        run(
            &paths,
            ConfigAction::Set("max-document-bytes".into(), "2048".into()),
        )
        .unwrap();
        let shown = run(&paths, ConfigAction::ShowKey("max-document-bytes".into())).unwrap();
        assert_eq!(shown.messages[0].content, "2048");
    }

    #[test]
    fn bad_key_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BoardPaths {
            data_dir: dir.path().to_path_buf(),
        };
        let result = run(&paths, ConfigAction::Set("nope".into(), "1".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!dir.path().join("config.json").exists());
    }
}
