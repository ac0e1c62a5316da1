//! Replayable operation scripts.
//!
//! A [`Trace`] is what a randomized tree test executes. It serializes to JSON
//! so a failing run can be printed, saved, and replayed verbatim, and it
//! carries a sorted-`Vec` reference model that says what the tree must hold
//! after each step.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "key", rename_all = "snake_case")]
pub enum Op {
    Insert(i64),
    /// Removes one element equal to the key; a miss is a no-op.
    Remove(i64),
    Clear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub seed: Vec<u8>,
    pub ops: Vec<Op>,
}

impl Trace {
    pub fn new(ops: Vec<Op>) -> Self {
        Self {
            seed: Vec::new(),
            ops,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Runs every op through `apply` together with the model contents
    /// expected right after that op.
    pub fn replay<F>(&self, mut apply: F)
    where
        F: FnMut(usize, Op, &Model),
    {
        let mut model = Model::default();
        for (step, &op) in self.ops.iter().enumerate() {
            model.apply(op);
            apply(step, op, &model);
        }
    }

    /// Model contents after the whole trace.
    pub fn expected(&self) -> Vec<i64> {
        let mut model = Model::default();
        for &op in &self.ops {
            model.apply(op);
        }
        model.into_sorted()
    }
}

/// Sorted multiset used as the oracle for tree contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    sorted: Vec<i64>,
}

impl Model {
    /// Applies `op`; returns `false` for a removal that found nothing.
    pub fn apply(&mut self, op: Op) -> bool {
        match op {
            Op::Insert(key) => {
                let at = self.sorted.partition_point(|&k| k <= key);
                self.sorted.insert(at, key);
                true
            }
            Op::Remove(key) => match self.sorted.binary_search(&key) {
                Ok(at) => {
                    self.sorted.remove(at);
                    true
                }
                Err(_) => false,
            },
            Op::Clear => {
                self.sorted.clear();
                true
            }
        }
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn into_sorted(self) -> Vec<i64> {
        self.sorted
    }
}
