//! Tests for generation outcomes and fixed-point propagation

#[cfg(test)]
mod tests {
    use wavecollapse::algorithm::model::{Model, Outcome, propagate_to_fixed_point};
    use wavecollapse::spatial::{PixelGrid, WaveState};

    // Clears one dirty flag per sweep so the sweep count equals the dirty count
    struct OneFlagPerSweep;

    impl Model for OneFlagPerSweep {
        fn dimensions(&self) -> (usize, usize) {
            (3, 2)
        }

        fn stationary(&self) -> &[f64] {
            &[1.0, 1.0]
        }

        fn on_boundary(&self, _x: usize, _y: usize) -> bool {
            false
        }

        fn propagate(&self, state: &mut WaveState) -> bool {
            for x in 0..3 {
                for y in 0..2 {
                    if state.is_changed(x, y) {
                        state.clear_changed(x, y);
                        return true;
                    }
                }
            }
            false
        }

        fn render(&self, _state: &WaveState, _outcome: Outcome) -> PixelGrid {
            PixelGrid::new(3, 2)
        }
    }

    // Tests only success and contradiction count as finished
    // Verified by treating Incomplete as finished
    #[test]
    fn test_outcome_is_finished() {
        assert!(!Outcome::Incomplete.is_finished());
        assert!(Outcome::Success.is_finished());
        assert!(Outcome::Contradiction.is_finished());
        assert_eq!(Outcome::default(), Outcome::Incomplete);
    }

    // Tests the fixed-point loop repeats until propagate reports no change
    // Verified by stopping after the first sweep
    #[test]
    fn test_propagate_to_fixed_point_counts_sweeps() {
        let model = OneFlagPerSweep;
        let mut state = WaveState::new(3, 2, model.stationary().to_vec());
        state.mark_changed(0, 0);
        state.mark_changed(2, 1);
        state.mark_changed(1, 0);

        let sweeps = propagate_to_fixed_point(&model, &mut state);
        assert_eq!(sweeps, 3);
        assert!(!state.has_changes());
    }

    // Tests the default clear resets the wave and the dirty flags
    // Verified by removing the reset call from the default clear
    #[test]
    fn test_default_clear_resets_state() {
        let model = OneFlagPerSweep;
        let mut state = WaveState::new(3, 2, model.stationary().to_vec());
        state.collapse(1, 1, 0);
        assert!(state.has_changes());

        model.clear(&mut state);
        assert!(!state.has_changes());
        assert_eq!(state.remaining_candidates(), 3 * 2 * 2);
    }
}
