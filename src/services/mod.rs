//! Services layer for the Argus evaluation core
//!
//! External collaborator clients: the chat-completion API used for judge
//! and regeneration calls, and the Langfuse tracing sink.

pub mod langfuse;
pub mod openai;

pub use langfuse::LangfuseSink;
pub use openai::OpenAiClient;
