#[path = "nist_vectors/mod.rs"]
mod nist_vectors;
