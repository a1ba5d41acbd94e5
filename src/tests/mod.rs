// Test modules for the agent components
pub mod fixtures;
pub mod test_rollout;
