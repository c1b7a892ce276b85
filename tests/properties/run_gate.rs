//! Property tests for the run-id gate.

use proptest::prelude::*;

use watchrun::application::watch::RunRegistry;
use watchrun::infrastructure::RecordingDisplay;
use watchrun::{Display, RunId};

#[derive(Debug, Clone)]
enum Op {
    /// Start a new run
    Begin,
    /// Write from the n-th started run (wrapping)
    Write(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Begin),
        3 => (0usize..16).prop_map(Op::Write),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: only writes of the latest run reach the display.
    #[test]
    fn property_only_current_run_writes(ops in proptest::collection::vec(op(), 1..64)) {
        let display = RecordingDisplay::new();
        let registry = RunRegistry::new(display.clone());
        let mut started: Vec<RunId> = Vec::new();
        let mut expected = String::new();

        for (step, op) in ops.iter().enumerate() {
            match op {
                Op::Begin => {
                    let (id, _) = registry.begin_new_run();
                    if let Some(last) = started.last() {
                        prop_assert!(id > *last);
                    }
                    started.push(id);
                }
                Op::Write(n) => {
                    let Some(&id) = started.get(n % started.len().max(1)) else {
                        continue;
                    };
                    let text = format!("{id}@{step};");
                    let shown = registry.with_current(id, |d| d.append(text.as_bytes()));
                    let is_latest = started.last() == Some(&id);
                    prop_assert_eq!(shown.is_some(), is_latest);
                    if is_latest {
                        expected.push_str(&text);
                    }
                }
            }
        }

        prop_assert_eq!(display.full_transcript(), expected);
    }
}
