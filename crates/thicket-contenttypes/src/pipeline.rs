//! Pipeline runner
//!
//! A pipeline is a fixed list of steps folded over a state value. Steps
//! run in order; the first failure aborts the fold and is returned
//! unchanged.

use crate::error::ContentTypeError;

/// One validator or creator of a content type pipeline
pub trait Step<C, S>: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Apply the step to `state`
    ///
    /// # Returns
    /// - `Ok(state)` with the step's additions
    /// - `Err(ContentTypeError)` to abort the pipeline
    fn apply(&self, command: &C, state: S) -> Result<S, ContentTypeError>;
}

/// Ordered list of steps for one command type
pub struct Pipeline<C, S> {
    name: &'static str,
    steps: Vec<Box<dyn Step<C, S>>>,
}

impl<C, S> Pipeline<C, S> {
    /// Start building a pipeline
    #[inline]
    #[must_use]
    pub fn builder(name: &'static str) -> PipelineBuilder<C, S> {
        PipelineBuilder {
            name,
            steps: Vec::new(),
        }
    }

    /// Pipeline name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Step names in execution order
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step over `initial`
    ///
    /// # Returns
    /// - `Ok(state)` after the last step
    /// - `Err(ContentTypeError)` of the first failing step; later steps
    ///   do not run
    pub fn execute(&self, command: &C, initial: S) -> Result<S, ContentTypeError> {
        let span = tracing::info_span!("pipeline", pipeline = self.name);
        let _enter = span.enter();

        let state = self
            .steps
            .iter()
            .enumerate()
            .try_fold(initial, |state, (index, step)| {
                tracing::debug!(step = step.name(), index, "applying step");
                step.apply(command, state).map_err(|err| {
                    tracing::warn!(step = step.name(), index, error = %err, "step failed");
                    err
                })
            })?;

        tracing::debug!(steps = self.steps.len(), "pipeline completed");
        Ok(state)
    }
}

impl<C, S> std::fmt::Debug for Pipeline<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}

/// Builder for [`Pipeline`]
pub struct PipelineBuilder<C, S> {
    name: &'static str,
    steps: Vec<Box<dyn Step<C, S>>>,
}

impl<C, S> PipelineBuilder<C, S> {
    /// Append a step
    #[must_use]
    pub fn step(mut self, step: impl Step<C, S> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Finish the pipeline
    #[must_use]
    pub fn build(self) -> Pipeline<C, S> {
        Pipeline {
            name: self.name,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Push(&'static str);

    impl Step<(), Vec<&'static str>> for Push {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(
            &self,
            _command: &(),
            mut state: Vec<&'static str>,
        ) -> Result<Vec<&'static str>, ContentTypeError> {
            state.push(self.0);
            Ok(state)
        }
    }

    struct Fail;

    impl Step<(), Vec<&'static str>> for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn apply(
            &self,
            _command: &(),
            _state: Vec<&'static str>,
        ) -> Result<Vec<&'static str>, ContentTypeError> {
            Err(ContentTypeError::MissingSubjectPosition)
        }
    }

    struct Count(Arc<AtomicUsize>);

    impl Step<(), Vec<&'static str>> for Count {
        fn name(&self) -> &'static str {
            "count"
        }

        fn apply(
            &self,
            _command: &(),
            state: Vec<&'static str>,
        ) -> Result<Vec<&'static str>, ContentTypeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(state)
        }
    }

    #[test]
    fn steps_run_in_order() {
        let pipeline = Pipeline::builder("test")
            .step(Push("a"))
            .step(Push("b"))
            .step(Push("c"))
            .build();

        let state = pipeline.execute(&(), Vec::new()).unwrap();

        assert_eq!(state, vec!["a", "b", "c"]);
        assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failure_stops_the_fold() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::builder("test")
            .step(Push("a"))
            .step(Fail)
            .step(Count(Arc::clone(&calls)))
            .build();

        let err = pipeline.execute(&(), Vec::new()).unwrap_err();

        assert_eq!(err, ContentTypeError::MissingSubjectPosition);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_pipeline_returns_initial_state() {
        let pipeline: Pipeline<(), Vec<&'static str>> = Pipeline::builder("empty").build();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.execute(&(), vec!["x"]).unwrap(), vec!["x"]);
    }
}
