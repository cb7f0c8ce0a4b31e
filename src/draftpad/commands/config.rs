use crate::commands::{CmdMessage, CmdResult};
use crate::config::DraftConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    Get(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = DraftConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            for key in DraftConfig::KEYS {
                result.add_message(CmdMessage::info(format!("{} = {}", key, config.get(key)?)));
            }
        }
        ConfigAction::Get(key) => {
            result.add_message(CmdMessage::info(format!("{} = {}", key, config.get(&key)?)));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                config.get(&key)?
            )));
        }
    }

    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_persists_and_get_reads_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        run(
            temp_dir.path(),
            ConfigAction::Set("preview-debounce".into(), "120".into()),
        )
        .unwrap();

        let result = run(temp_dir.path(), ConfigAction::Get("preview-debounce".into())).unwrap();
        assert_eq!(result.messages[0].content, "preview-debounce = 120");
        assert_eq!(result.config.unwrap().preview_debounce_ms, 120);
    }

    #[test]
    fn show_all_lists_every_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(temp_dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.messages.len(), DraftConfig::KEYS.len());
    }

    #[test]
    fn unknown_key_fails_without_writing() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(run(temp_dir.path(), ConfigAction::Set("colour".into(), "red".into())).is_err());
        assert!(!temp_dir.path().join("config.json").exists());
    }
}
