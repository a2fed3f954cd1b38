use std::{future::Future, sync::Arc};

use burn::{
    data::dataset::Dataset,
    tensor::backend::AutodiffBackend,
    train::ValidStep,
};

use crate::datasets::quora;

use super::{batcher::Train, evaluation::Evaluation, training, Item, Model, Output, Training};

/// Normalize the records when configured, then split them once into `(train, test)`
pub fn prepare(dataset: quora::Dataset, config: &Training) -> (quora::Dataset, quora::Dataset) {
    let dataset = if config.normalize {
        log::info!("Normalizing {} records", dataset.len());

        dataset.normalize()
    } else {
        dataset
    };

    let (train, test) = dataset.split(config.test_size, config.seed);

    log::info!("Split into {} training and {} test records", train.len(), test.len());

    (train, test)
}

/// Fine-tune and evaluate every configured model in turn on the same split. The first failure
/// ends the run.
pub async fn run<B, M, I, D>(
    devices: Vec<B::Device>,
    dataset_train: D,
    dataset_test: D,
    config: &Training,
) -> anyhow::Result<Vec<(String, Evaluation)>>
where
    B: AutodiffBackend,
    M: Model<B> + 'static,
    I: Item + 'static,
    D: Dataset<I> + 'static,

    M::InnerModule: ValidStep<
        Train<<B as AutodiffBackend>::InnerBackend>,
        Output<<B as AutodiffBackend>::InnerBackend>,
    >,
{
    let dataset_train = Arc::new(dataset_train);
    let dataset_test = Arc::new(dataset_test);

    run_each(&config.model_names, |model_name| {
        let devices = devices.clone();
        let dataset_train = dataset_train.clone();
        let dataset_test = dataset_test.clone();

        async move {
            training::train::<B, M, I, Arc<D>>(
                devices,
                dataset_train,
                dataset_test,
                &model_name,
                config,
            )
            .await
        }
    })
    .await
}

/// Run `step` for each model name in order, collecting the evaluations. An error from any step
/// is returned right away and the remaining models are skipped.
pub async fn run_each<F, Fut>(
    model_names: &[String],
    mut step: F,
) -> anyhow::Result<Vec<(String, Evaluation)>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = anyhow::Result<Evaluation>>,
{
    if model_names.is_empty() {
        return Err(anyhow!("No models selected for training"));
    }

    let mut results = Vec::with_capacity(model_names.len());

    for (i, model_name) in model_names.iter().enumerate() {
        log::info!("[{}/{}] Training {}", i + 1, model_names.len(), model_name);

        let evaluation = step(model_name.clone())
            .await
            .map_err(|e| anyhow!("Training {} failed: {}", model_name, e))?;

        results.push((model_name.clone(), evaluation));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{metrics::Scores, models::bert};

    type TestBackend = Autodiff<NdArray<f32>>;

    fn dataset() -> quora::Dataset {
        quora::Dataset::new(
            (0..10)
                .map(|i| {
                    quora::Item::new(
                        format!("What is the answer to question {i}?"),
                        format!("Answer {i}"),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_prepare_normalizes_and_splits() {
        let (train, test) = prepare(dataset(), &Training::new());

        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        for item in train.items().into_iter().chain(test.items()) {
            assert!(item.question.starts_with("answer question"), "{item:?}");
            assert!(item.answer.starts_with("answer "), "{item:?}");
        }
    }

    fn evaluation(samples: usize) -> Evaluation {
        Evaluation {
            samples,
            scores: Scores::default(),
        }
    }

    #[tokio::test]
    async fn test_run_each_trains_every_model_in_order() -> anyhow::Result<()> {
        let names = vec!["first".to_string(), "second".to_string()];

        let results = run_each(&names, |name| async move { Ok(evaluation(name.len())) }).await?;

        let trained: Vec<(&str, usize)> = results
            .iter()
            .map(|(name, evaluation)| (name.as_str(), evaluation.samples))
            .collect();
        assert_eq!(trained, vec![("first", 5), ("second", 6)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_run_each_stops_at_first_failure() {
        let names = vec![
            "broken".to_string(),
            "second".to_string(),
            "third".to_string(),
        ];
        let mut attempted = Vec::new();

        let result = run_each(&names, |name| {
            attempted.push(name.clone());

            async move {
                if name == "broken" {
                    Err(anyhow!("weights not found"))
                } else {
                    Ok(evaluation(1))
                }
            }
        })
        .await;

        let error = result.err().map(|e| e.to_string()).unwrap_or_default();

        assert!(error.contains("broken"), "{error}");
        assert!(error.contains("weights not found"), "{error}");
        assert_eq!(attempted, vec!["broken".to_string()]);
    }

    #[tokio::test]
    async fn test_run_without_models() {
        let config = Training::new().with_model_names(vec![]);
        let (train, test) = prepare(dataset(), &config);

        let result = run::<
            TestBackend,
            bert::question_answering::Model<TestBackend>,
            quora::Item,
            quora::Dataset,
        >(vec![NdArrayDevice::Cpu], train, test, &config)
        .await;

        let error = result.err().map(|e| e.to_string()).unwrap_or_default();

        assert_eq!(error, "No models selected for training");
    }

    #[test]
    fn test_prepare_without_normalizing() {
        let config = Training::new().with_normalize(false);

        let (train, _) = prepare(dataset(), &config);

        assert!(train.items()[0].question.starts_with("What is"));
    }
}
