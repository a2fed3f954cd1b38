use burn::{
    config::Config as _,
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    lr_scheduler::noam::NoamLrSchedulerConfig,
    module::{AutodiffModule, Module},
    optim::AdamWConfig,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
    train::{
        metric::{AccuracyMetric, CudaMetric, LearningRateMetric, LossMetric},
        LearnerBuilder, ValidStep,
    },
};

use crate::utils::{hugging_face::download_hf_model, renderer};

use super::{
    batcher::Train,
    evaluation::{evaluate, Evaluation},
    tokenizer, Batcher, Item, Model, ModelConfig, Output, Training,
};

/// Fine-tune one pretrained model, evaluate it on the test split and persist the artifacts
pub async fn train<B, M, I, D>(
    devices: Vec<B::Device>, // Device on which to perform computation (e.g., CPU or CUDA device)
    dataset_train: D,        // Training dataset
    dataset_test: D,         // Testing dataset
    model_name: &str,        // The pretrained model to start from (e.g., "bert-base-uncased")
    config: &Training,       // Experiment configuration
) -> anyhow::Result<Evaluation>
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
    let device = &devices[0];
    let artifact_dir = config.artifact_dir(model_name);

    std::fs::create_dir_all(&artifact_dir)
        .map_err(|e| anyhow!("Unable to create artifact directory {}: {}", artifact_dir, e))?;

    let files = download_hf_model(model_name).await?;

    let mut model_config = M::Config::load_pretrained(
        files.config,
        config.hidden_dropout_prob,
        config.max_seq_length,
    )
    .await
    .map_err(|e| anyhow!("Unable to load pre-trained model config file: {}", e))?;

    let mut model = M::load_from_safetensors(device, files.weights, model_config.clone())?;

    // Initialize tokenizer, making sure there is a padding token
    let mut tokenizer = tokenizer::load(&files.tokenizer)?;
    let pad = tokenizer::ensure_pad_token(&mut tokenizer);

    model_config.set_pad_token_id(pad.id);

    if let Some(vocab_size) = pad.resize_to {
        model = model.resize_token_embeddings(vocab_size);
        model_config.set_vocab_size(vocab_size);
    }

    // Initialize batchers for training and testing data
    let batcher_train = Batcher::<B>::new(
        tokenizer.clone(),
        model_config.get_config(),
        config.label_strategy,
        device.clone(),
    );
    let batcher_test = Batcher::<B::InnerBackend>::new(
        tokenizer.clone(),
        model_config.get_config(),
        config.label_strategy,
        device.clone(),
    );

    let workers = match config.num_workers {
        Some(workers) => workers,
        None => std::thread::available_parallelism()?.into(),
    };

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(workers)
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.eval_batch_size)
        .num_workers(workers)
        .build(dataset_test);

    // Initialize optimizer
    let optimizer = AdamWConfig::new().with_epsilon(config.adam_epsilon).init();

    // Initialize learning rate scheduler
    let lr_scheduler = NoamLrSchedulerConfig::new(config.learning_rate)
        .with_warmup_steps(0)
        .with_model_size(model_config.get_config().hidden_size)
        .init();

    // Initialize learner
    let learner = LearnerBuilder::new(&artifact_dir)
        .metric_train(CudaMetric::new())
        .metric_valid(CudaMetric::new())
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .renderer(renderer::Logging::new(config.logging_steps))
        .devices(devices)
        .num_epochs(config.num_epochs)
        .summary()
        .build(model, optimizer, lr_scheduler);

    log::info!("Fine-tuning {model_name} into {artifact_dir}");

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_test.clone());

    // Save the configurations, the tokenizer and the trained model
    model_config
        .save(format!("{artifact_dir}/config.json"))
        .map_err(|e| anyhow!("Unable to save model config: {}", e))?;

    config.save_to(&artifact_dir)?;

    tokenizer
        .save(format!("{artifact_dir}/tokenizer.json"), false)
        .map_err(|e| anyhow!("Unable to save tokenizer: {}", e))?;

    CompactRecorder::new()
        .record(
            model_trained.clone().into_record(),
            format!("{artifact_dir}/model").into(),
        )
        .map_err(|e| anyhow!("Unable to save trained model weights: {}", e))?;

    // Score the trained model on the held-out split
    let evaluation = evaluate(&model_trained.valid(), dataloader_test, &tokenizer)?;
    evaluation.save_to(&artifact_dir)?;

    Ok(evaluation)
}
