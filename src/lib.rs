//! # scenario-reduce — Diversity-driven test-suite reduction
//!
//! Reduces a pool of recorded simulation-scenario outcomes to a minimal,
//! cost-bounded subset that covers every observed collision at least once
//! and maximizes behavioral diversity per unit of execution cost.
//!
//! ## Pipeline
//!
//! One invocation makes a single pass through four stages. Data flows one
//! way; each stage owns its input and hands an immutable artifact to the
//! next.
//!
//! | Stage | Rust module | Produces |
//! |-------|-------------|----------|
//! | 1. Record loading | [`records`] | one [`records::ScenarioOutcome`] per usable record file |
//! | 2. Vectorization | [`features`] | [`features::FeatureMatrix`]: batch-scaled numeric + one-hot columns |
//! | 3. Diversity estimation | [`diversity`] | per-scenario mean Manhattan dissimilarity |
//! | 4. Greedy selection | [`select`] | ordered ids covering every collision occurrence |
//!
//! [`report`] projects the result into the JSON emission format, and
//! [`pipeline`] wires the stages behind [`pipeline::run_analysis`]. The
//! attribute vocabulary both the loader and the vectorizer read through is
//! declared in [`schema`].
//!
//! ## Selection objective
//!
//! With `p` collision-flagged scenarios in the pool, each round picks the
//! unselected scenario maximizing
//!
//! ```text
//! (0.5 * diversity + 0.5 * collision_flag) / normalized_exec_time
//! ```
//!
//! until all `p` occurrences are covered or no candidate remains. A pool
//! with no collisions is returned whole. For a fixed input set the whole
//! pass is bit-reproducible: traversal order, category order, summation
//! order, and tie-breaking are all fixed.

pub mod diversity;
pub mod features;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod schema;
pub mod select;
