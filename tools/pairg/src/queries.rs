//! Batches of point queries answered in parallel

use rand::Rng;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

use crate::heuristics::reachable_within_bound;
use crate::matrix::{BoolCsr, IndexedCsr, RowExecutor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBatch {
    pairs: Vec<(usize, usize)>,
}

/// Answers in query order plus wall-clock time for the whole batch
#[derive(Debug, Clone)]
pub struct BatchAnswers {
    pub answers: Vec<bool>,
    pub elapsed_ms: u64,
}

impl BatchAnswers {
    pub fn positives(&self) -> usize {
        self.answers.iter().filter(|&&a| a).count()
    }
}

impl QueryBatch {
    pub fn from_pairs(pairs: Vec<(usize, usize)>) -> Self {
        Self { pairs }
    }

    /// `count` random pairs over `n_vertices`; each target lies at most
    /// `max_offset` ids after its source so that nearby pairs show up.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        n_vertices: usize,
        count: usize,
        max_offset: usize,
    ) -> Self {
        if n_vertices == 0 {
            return Self { pairs: Vec::new() };
        }
        let pairs = (0..count)
            .map(|_| {
                let src = rng.random_range(0..n_vertices);
                let target = (src + rng.random_range(0..=max_offset)).min(n_vertices - 1);
                (src, target)
            })
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn answer_with_index(&self, exec: &RowExecutor, index: &IndexedCsr) -> BatchAnswers {
        let start = Instant::now();
        let answers = exec.install(|| {
            self.pairs
                .par_iter()
                .map(|&(i, j)| index.query(i, j))
                .collect()
        });
        self.finish("index", answers, start)
    }

    pub fn answer_with_bfs(&self, exec: &RowExecutor, a: &BoolCsr, d_up: u32) -> BatchAnswers {
        let start = Instant::now();
        let answers = exec.install(|| {
            self.pairs
                .par_iter()
                .map(|&(i, j)| reachable_within_bound(a, d_up, i, j))
                .collect()
        });
        self.finish("bfs", answers, start)
    }

    fn finish(&self, method: &str, answers: Vec<bool>, start: Instant) -> BatchAnswers {
        let batch = BatchAnswers {
            answers,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            method,
            queries = self.len(),
            positives = batch.positives(),
            time_ms = batch.elapsed_ms,
            "answered query batch"
        );
        batch
    }
}

/// Count of positions where two answer sets disagree
pub fn cross_check(left: &BatchAnswers, right: &BatchAnswers) -> usize {
    left.answers
        .iter()
        .zip(&right.answers)
        .filter(|(a, b)| a != b)
        .count()
        + left.answers.len().abs_diff(right.answers.len())
}
