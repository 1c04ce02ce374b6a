pub mod generate_snapshot;
