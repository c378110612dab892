use std::path::{Path, PathBuf};
use serde_derive::{Serialize, Deserialize};

use crate::constants::ZS_FLAG_WIDTH;
use crate::error::ConfigError;
use crate::frame_writer::OutputMode;

/// # Config
/// Structure representing the application configuration. Contains pathing,
/// output mode and batching for one re-write run. Configs are serializable
/// and deserializable to YAML using serde and serde_yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scan_path: PathBuf,
    pub out_path: PathBuf,
    pub output_mode: OutputMode,
    pub batch_size: usize,
    pub chamber_id: u16,
    pub print_events: usize
}

impl Config {

    #[allow(dead_code)]
    pub fn default() -> Self {
        Self {
            scan_path: PathBuf::from("ThresholdScan.dat"),
            out_path: PathBuf::from("DataParkerThreshold.dat"),
            output_mode: OutputMode::Hex,
            batch_size: 3,
            chamber_id: 0xdea,
            print_events: 30
        }
    }

    /// Read the configuration in a YAML file
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        let config = serde_yaml::from_str::<Self>(&yaml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// The batch size drives the flush cadence and the zero suppression
    /// slot rotation, so it must address the 24 slot flag field. The
    /// chamber id must fit its 12 bit header field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > ZS_FLAG_WIDTH as usize {
            return Err(ConfigError::BadBatchSize);
        }
        if self.chamber_id > 0x0fff {
            return Err(ConfigError::BadChamberId(self.chamber_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_yaml_config() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file,
            "scan_path: /data/ThresholdScan.dat\n\
             out_path: /data/rewrite.dat\n\
             output_mode: Binary\n\
             batch_size: 3\n\
             chamber_id: 100\n\
             print_events: 5\n"
        ).unwrap();

        let config = Config::read_config_file(&path).unwrap();
        assert_eq!(config.output_mode, OutputMode::Binary);
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.chamber_id, 100);
    }

    #[test]
    fn missing_config_is_bad_path() {
        let result = Config::read_config_file(Path::new("/no/such/config.yaml"));
        assert!(matches!(result, Err(ConfigError::BadFilePath(_))));
    }

    #[test]
    fn rejects_zero_batch_and_wide_chamber() {
        let mut config = Config::default();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::BadBatchSize)));

        let mut config = Config::default();
        config.batch_size = 25;
        assert!(matches!(config.validate(), Err(ConfigError::BadBatchSize)));

        let mut config = Config::default();
        config.chamber_id = 0x1000;
        assert!(matches!(config.validate(), Err(ConfigError::BadChamberId(0x1000))));
    }
}
