pub mod command;
pub mod filesystem;
pub mod http;
pub mod output;
pub mod user_input;

pub use command::{CommandExecutor, RealCommandExecutor};
pub use filesystem::{FileSystem, RealFileSystem};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use output::{Output, TerminalOutput};
pub use user_input::{InquireUserInput, UserInput};

#[cfg(test)]
pub use command::{MockCommandExecutor, MockCommandResult};
#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use http::MockHttpClient;
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
#[cfg(test)]
pub use user_input::{MockResponse, MockUserInput};
