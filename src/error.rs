use std::fmt::Display;
use std::path::PathBuf;
use std::error::Error;

/*
    Bit packing errors
 */
#[derive(Debug, Clone, PartialEq)]
pub enum BitsError {
    FieldTooWide(u64, u32)
}

impl Display for BitsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BitsError::FieldTooWide(value, width) => write!(f, "Value 0x{:x} does not fit in a {} bit field!", value, width)
        }
    }
}

impl Error for BitsError {

}

/*
    VFATFrame errors
 */
#[derive(Debug)]
pub enum VFATFrameError {
    Truncated(usize),
    BadHexToken(String, std::num::ParseIntError),
    Overflow(String),
    BadFloatToken(String, std::num::ParseFloatError)
}

impl Display for VFATFrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VFATFrameError::Truncated(n) => write!(f, "Stream ended mid frame! Only {} of 9 tokens were available", n),
            VFATFrameError::BadHexToken(token, e) => write!(f, "Token {} could not be parsed as hex: {}", token, e),
            VFATFrameError::Overflow(token) => write!(f, "Hex token {} is wider than its target field!", token),
            VFATFrameError::BadFloatToken(token, e) => write!(f, "Token {} could not be parsed as a decimal value: {}", token, e)
        }
    }
}

impl Error for VFATFrameError {

}

/*
    ScanFile errors
 */
#[derive(Debug)]
pub enum ScanFileError {
    BadFilePath(PathBuf),
    EndOfFile,
    Truncated(usize),
    BadFrame(VFATFrameError),
    BadHeaderToken(String),
    BadStepSize(i32),
    IOError(std::io::Error)
}

impl From<VFATFrameError> for ScanFileError {
    fn from(value: VFATFrameError) -> Self {
        match value {
            VFATFrameError::Truncated(n) => ScanFileError::Truncated(n),
            _ => ScanFileError::BadFrame(value)
        }
    }
}

impl From<std::io::Error> for ScanFileError {
    fn from(value: std::io::Error) -> Self {
        ScanFileError::IOError(value)
    }
}

impl Display for ScanFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanFileError::BadFilePath(path) => write!(f, "File {} does not exist at ScanFile::new!", path.display()),
            ScanFileError::EndOfFile => write!(f, "File reached end!"),
            ScanFileError::Truncated(n) => write!(f, "Scan file ended mid record with only {} tokens!", n),
            ScanFileError::BadFrame(e) => write!(f, "Bad frame found when reading ScanFile! Error: {}", e),
            ScanFileError::BadHeaderToken(token) => write!(f, "Scan header token {} is not a decimal integer!", token),
            ScanFileError::BadStepSize(step) => write!(f, "Scan header step size {} must be positive!", step),
            ScanFileError::IOError(e) => write!(f, "ScanFile recieved an io error: {}!", e)
        }
    }
}

impl Error for ScanFileError {

}

/*
    EventBuilder errors
 */
#[derive(Debug)]
pub enum EventBuilderError {
    HeaderPacking(BitsError),
    BadChipPosition(u32)
}

impl From<BitsError> for EventBuilderError {
    fn from(value: BitsError) -> Self {
        EventBuilderError::HeaderPacking(value)
    }
}

impl Display for EventBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventBuilderError::HeaderPacking(e) => write!(f, "The event builder could not pack a board header: {}", e),
            EventBuilderError::BadChipPosition(slot) => write!(f, "Chip position {} does not address one of the 24 zero suppression slots!", slot)
        }
    }
}

impl Error for EventBuilderError {

}

/*
    FrameWriter errors
 */
#[derive(Debug)]
pub enum WriterError {
    BadFilePath(PathBuf, std::io::Error),
    IOError(std::io::Error)
}

impl From<std::io::Error> for WriterError {
    fn from(value: std::io::Error) -> Self {
        WriterError::IOError(value)
    }
}

impl Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterError::BadFilePath(path, e) => write!(f, "Output file {} could not be opened for append: {}", path.display(), e),
            WriterError::IOError(e) => write!(f, "FrameWriter recieved an io error: {}", e)
        }
    }
}

impl Error for WriterError {

}

/*
    Config errors
 */
#[derive(Debug)]
pub enum ConfigError {
    BadFilePath(PathBuf),
    IOError(std::io::Error),
    ParsingError(serde_yaml::Error),
    BadBatchSize,
    BadChamberId(u16)
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::IOError(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        ConfigError::ParsingError(value)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::BadFilePath(path) => write!(f, "File {} given to Config does not exist!", path.display()),
            ConfigError::IOError(e) => write!(f, "Config received an io error: {}", e),
            ConfigError::ParsingError(e) => write!(f, "Config received a parsing error: {}", e),
            ConfigError::BadBatchSize => write!(f, "Config batch_size must be at least 1!"),
            ConfigError::BadChamberId(id) => write!(f, "Config chamber_id 0x{:x} does not fit in 12 bits!", id)
        }
    }
}

impl Error for ConfigError {

}

/*
    Processor errors
 */
#[derive(Debug)]
pub enum ProcessorError {
    ScanError(ScanFileError),
    BuilderError(EventBuilderError),
    WriteError(WriterError),
    ConfigError(ConfigError)
}

impl From<ScanFileError> for ProcessorError {
    fn from(value: ScanFileError) -> Self {
        ProcessorError::ScanError(value)
    }
}

impl From<EventBuilderError> for ProcessorError {
    fn from(value: EventBuilderError) -> Self {
        ProcessorError::BuilderError(value)
    }
}

impl From<WriterError> for ProcessorError {
    fn from(value: WriterError) -> Self {
        ProcessorError::WriteError(value)
    }
}

impl From<ConfigError> for ProcessorError {
    fn from(value: ConfigError) -> Self {
        ProcessorError::ConfigError(value)
    }
}

impl Display for ProcessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessorError::ScanError(e) => write!(f, "The processor recieved a scan file error: {}", e),
            ProcessorError::BuilderError(e) => write!(f, "The processor recieved an event builder error: {}", e),
            ProcessorError::WriteError(e) => write!(f, "The processor recieved a writer error: {}", e),
            ProcessorError::ConfigError(e) => write!(f, "The processor recieved a config error: {}", e)
        }
    }
}

impl Error for ProcessorError {

}
