pub mod create_passage;
pub mod registry;
pub mod retrieve_agent;

pub use create_passage::CreatePassageTool;
pub use retrieve_agent::RetrieveAgentTool;
