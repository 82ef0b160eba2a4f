use crate::preprocess::ImageInput;
use async_trait::async_trait;
use dermascan_core::error::ScorerError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A black-box scoring function: one preprocessed image in, one
/// probability distribution out, in the scorer's fixed label order.
///
/// Implementations must be safe for concurrent invocation; the cascade
/// treats them as stateless, re-entrant services and performs no
/// caching, retries or timeouts around the call.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, input: &ImageInput) -> Result<Vec<f32>, ScorerError>;

    fn name(&self) -> &str;

    /// Number of labels this scorer emits probabilities for.
    fn num_labels(&self) -> usize;
}

/// Queue-backed scorer for tests: each call pops the next canned
/// response. Also counts invocations, so tests can assert that a stage
/// was (or was not) reached.
pub struct MockScorer {
    responses: Mutex<VecDeque<Result<Vec<f32>, ScorerError>>>,
    calls: AtomicUsize,
    name: String,
    num_labels: usize,
}

impl MockScorer {
    pub fn new(name: impl Into<String>, num_labels: usize) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            name: name.into(),
            num_labels,
        }
    }

    pub fn add_distribution(&self, scores: Vec<f32>) {
        self.responses.lock().unwrap().push_back(Ok(scores));
    }

    pub fn add_error(&self, error: ScorerError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// How many times `score` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Scorer for MockScorer {
    async fn score(&self, _input: &ImageInput) -> Result<Vec<f32>, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ScorerError::Inference(
                    "MockScorer: no more responses in queue".to_string(),
                ))
            })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn num_labels(&self) -> usize {
        self.num_labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};

    fn blank_input() -> ImageInput {
        let tensor = Tensor::zeros(
            (3, crate::preprocess::IMG_SIZE, crate::preprocess::IMG_SIZE),
            DType::F32,
            &Device::Cpu,
        )
        .unwrap();
        ImageInput::from_tensor(tensor)
    }

    #[tokio::test]
    async fn test_mock_pops_in_order() {
        let scorer = MockScorer::new("mock", 4);
        scorer.add_distribution(vec![0.9, 0.1, 0.0, 0.0]);
        scorer.add_distribution(vec![0.2, 0.8, 0.0, 0.0]);

        let input = blank_input();
        assert_eq!(scorer.score(&input).await.unwrap()[0], 0.9);
        assert_eq!(scorer.score(&input).await.unwrap()[1], 0.8);
        assert_eq!(scorer.calls(), 2);
        assert_eq!(scorer.remaining_responses(), 0);
    }

    #[tokio::test]
    async fn test_mock_exhausted_queue_errors() {
        let scorer = MockScorer::new("mock", 4);
        let input = blank_input();
        assert!(scorer.score(&input).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_replays_errors() {
        let scorer = MockScorer::new("mock", 6);
        scorer.add_error(ScorerError::Inference("boom".to_string()));
        let input = blank_input();
        let err = scorer.score(&input).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
