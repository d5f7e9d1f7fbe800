//! Sample × representation-mode matrix for deflate parity.

use futures::FutureExt;
use tracing::info;

use crate::codec::CandidateCodec;
use crate::corpus::{Corpus, Sample};
use crate::deflate_diff::compare_one;
use crate::error::HarnessError;
use crate::options::OptionSet;
use crate::queue::{Task, TaskQueue};
use crate::repr::RepresentationMode;
use crate::stream::ReferenceFactory;

/// Queue one comparison per (sample, mode): corpus order, then untyped
/// before typed.
pub fn build_queue<'a, F, C>(
    corpus: &'a Corpus<Sample>,
    factory: &'a F,
    candidate: &'a C,
    options: &'a OptionSet,
) -> TaskQueue<'a>
where
    F: ReferenceFactory + ?Sized,
    C: CandidateCodec + ?Sized,
{
    let mut queue = TaskQueue::new();
    for sample in corpus.iter() {
        for mode in RepresentationMode::ALL {
            queue.push(Task::new(format!("{}/{mode}", sample.name), move || {
                compare_one(factory, candidate, sample, options, mode).boxed_local()
            }));
        }
    }
    queue
}

/// Run the deflate matrix for one option set, stopping at the first
/// failing task.
pub async fn run<F, C>(
    corpus: &Corpus<Sample>,
    factory: &F,
    candidate: &C,
    options: &OptionSet,
) -> Result<(), HarnessError>
where
    F: ReferenceFactory + ?Sized,
    C: CandidateCodec + ?Sized,
{
    let queue = build_queue(corpus, factory, candidate, options);
    let tasks = queue.len();
    queue.run_series().await?;
    info!(samples = corpus.len(), tasks, ?options, "deflate matrix passed");
    Ok(())
}

/// Run the matrix once per option set, in order. The first failing set
/// ends the sweep.
pub async fn run_option_sets<F, C>(
    corpus: &Corpus<Sample>,
    factory: &F,
    candidate: &C,
    option_sets: &[OptionSet],
) -> Result<(), HarnessError>
where
    F: ReferenceFactory + ?Sized,
    C: CandidateCodec + ?Sized,
{
    for options in option_sets {
        run(corpus, factory, candidate, options).await?;
    }
    info!(option_sets = option_sets.len(), "option sweep passed");
    Ok(())
}
