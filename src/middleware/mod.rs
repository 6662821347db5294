pub mod actor_context;
