//! Tunable numeric tolerances used by SAT, clipping, and sphere-vs-convex.
//!
//! Every field has a default matching the constants stated inline in the
//! design notes below (`1e-6`, `1e-10`, `±100`); a host engine embedding
//! this core can retune them without forking the crate, the same way
//! `PhysicsConfig` elsewhere in this engine exposes gravity and solver
//! iteration counts as knobs around otherwise-fixed algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrowPhaseConfig {
    /// Edge-edge cross products in SAT with squared length below this are
    /// treated as "no candidate axis" rather than normalized. Default: 1e-6.
    pub sat_parallel_edge_epsilon_sq: f64,
    /// Minimum signed distance (from the reference face plane) a clipped
    /// vertex must have to be kept. Default: -100.0.
    pub clip_min_distance: f64,
    /// Maximum signed distance a clipped vertex may have to be kept.
    /// Default: 100.0.
    pub clip_max_distance: f64,
    /// Squared-length threshold below which a vector is treated as the zero
    /// vector in `direction`/normalize call sites that must guard against
    /// it (e.g. sphere-sphere centers that coincide). Default: 1e-12.
    pub zero_vector_epsilon_sq: f64,
}

impl Default for NarrowPhaseConfig {
    fn default() -> Self {
        Self {
            sat_parallel_edge_epsilon_sq: 1e-6 * 1e-6,
            clip_min_distance: -100.0,
            clip_max_distance: 100.0,
            zero_vector_epsilon_sq: 1e-12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = NarrowPhaseConfig::default();
        assert_eq!(cfg.clip_min_distance, -100.0);
        assert_eq!(cfg.clip_max_distance, 100.0);
        assert!(cfg.sat_parallel_edge_epsilon_sq > 0.0);
    }
}
