use crate::config::ImporterConfig;
use crate::import::{RandomSuffix, SequentialSuffix, SuffixSource};
use crate::traits::{
    CommandExecutor, FileSystem, HttpClient, InquireUserInput, Output, RealCommandExecutor,
    RealFileSystem, ReqwestClient, TerminalOutput, UserInput,
};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub command: Arc<dyn CommandExecutor>,
    pub http: Arc<dyn HttpClient>,
    pub suffix: Arc<dyn SuffixSource>,
    pub config: ImporterConfig,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new(config: ImporterConfig) -> Self {
        let suffix: Arc<dyn SuffixSource> = match config.suffix_start {
            Some(start) => Arc::new(SequentialSuffix::starting_at(start)),
            None => Arc::new(RandomSuffix),
        };

        Self {
            fs: Arc::new(RealFileSystem),
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
            command: Arc::new(RealCommandExecutor::new()),
            http: Arc::new(ReqwestClient::new()),
            suffix,
            config,
        }
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            input: Arc::clone(&self.input),
            output: Arc::clone(&self.output),
            command: Arc::clone(&self.command),
            http: Arc::clone(&self.http),
            suffix: Arc::clone(&self.suffix),
            config: self.config.clone(),
        }
    }
}
