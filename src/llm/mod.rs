// Remote chat completion layer

pub mod openai;
pub mod provider;

pub use openai::OpenAIClient;
pub use provider::*;
